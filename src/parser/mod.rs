pub mod parser;
pub mod precedence;

use crate::{ast::Program, error::Result, lexer::lexer::Lexer};

use self::parser::Parser;

/// Parses `input` in one pass. A non-empty error list means the program is
/// partial and must not be evaluated.
pub fn parse(input: &str) -> Result<(Program, Vec<String>)> {
    let lexer = Lexer::from_source(input)?;
    let mut parser = Parser::new(lexer.peekable())?;
    let program = parser.parse()?;

    Ok((program, parser.errors()))
}
