use std::{env, io::{self, IsTerminal}, process};

use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use mua::{
    error::Result,
    repl::{self, Config, Engine},
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("MUA_LOG"))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("mua: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_args(env::args().skip(1))?;
    let mut engine = Engine::new();

    if io::stdin().is_terminal() {
        interactive(&mut engine, &config)
    } else {
        repl::start(io::stdin(), &mut io::stdout(), &mut engine, &config)
    }
}

fn interactive(engine: &mut Engine, config: &Config) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut output = io::stdout();

    if let Some(path) = &config.history {
        if let Err(e) = rl.load_history(path) {
            debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    loop {
        match rl.readline(&config.prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                repl::eval_line(&line, &mut output, engine, config.mode)?;
            },
            // Ctrl-C drops the current line only.
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &config.history {
        if let Err(e) = rl.save_history(path) {
            warn!(path = %path.display(), error = %e, "could not save history");
        }
    }

    Ok(())
}
