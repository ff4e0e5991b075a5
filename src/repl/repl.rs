use std::{
    io::{BufRead, BufReader, Read, Write},
    rc::Rc,
};

use tracing::{debug, info};

use crate::{
    ast::Program,
    error::{Error, Result},
    interpreter::{
        environment::{Env, Environment, Output},
        evaluator,
        macro_expansion,
        object::MObject,
    },
    lexer,
    parser,
    repl::config::{Config, Mode},
};

/// Session state. Bindings and macro definitions from earlier lines stay
/// visible to later ones.
pub struct Engine {
    env: Env,
    macro_env: Env,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            macro_env: Environment::new(),
        }
    }

    /// `puts` writes to `output` instead of stdout, including during macro
    /// expansion.
    pub fn with_output(output: Output) -> Self {
        Self {
            env: Environment::with_output(Rc::clone(&output)),
            macro_env: Environment::with_output(output),
        }
    }

    pub fn run(&mut self, mut program: Program) -> Result<MObject> {
        macro_expansion::define_macros(&mut program, &self.macro_env);
        let expanded = macro_expansion::expand_macros(program, &self.macro_env)?;

        evaluator::eval_program(&expanded, &self.env)
    }
}

/// Reads lines from `input` until it is exhausted, writing one result per
/// line to `output`.
pub fn start<I: Read, O: Write>(input: I, output: &mut O, engine: &mut Engine, config: &Config) -> Result<()> {
    let mut bufio = BufReader::new(input);
    let mut buf = String::new();

    info!(mode = ?config.mode, "session started");

    loop {
        output.write_all(config.prompt.as_bytes())?;
        output.flush()?;

        buf.clear();
        if bufio.read_line(&mut buf)? == 0 {
            writeln!(output)?;
            break;
        }

        eval_line(&buf, output, engine, config.mode)?;
    }

    output.flush()?;

    Ok(())
}

/// Handles a single line of input. Syntax and macro errors are reported to
/// `output` and the session carries on.
pub fn eval_line<O: Write>(line: &str, output: &mut O, engine: &mut Engine, mode: Mode) -> Result<()> {
    if line.trim().is_empty() {
        return Ok(());
    }

    if mode == Mode::Tokens {
        for tok in lexer::tokenize(line)? {
            writeln!(output, "{}", tok)?;
        }
        return Ok(output.flush()?);
    }

    let (program, errors) = parser::parse(line)?;

    if !errors.is_empty() {
        debug!(count = errors.len(), "rejected line with syntax errors");
        return print_parser_errors(output, errors);
    }

    match mode {
        Mode::Ast => writeln!(output, "{}", program)?,
        _ => match engine.run(program) {
            Ok(evaluated) => writeln!(output, "{}", evaluated)?,
            Err(e @ Error::Macro(_)) => writeln!(output, "{}", e)?,
            Err(e) => return Err(e),
        },
    }

    Ok(output.flush()?)
}

fn print_parser_errors<O: Write>(output: &mut O, errors: Vec<String>) -> Result<()> {
    output.write_all(b"Parser errors:\n")?;
    for e in errors {
        writeln!(output, "\t{}", e)?;
    }

    Ok(output.flush()?)
}
