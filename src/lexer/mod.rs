pub mod lexer;
pub mod token;
pub mod token_type;

use crate::error::Result;

use self::{lexer::Lexer, token::Token};

/// Every token of `input` up to, but not including, the end-of-file marker.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::from_source(input)?.collect()
}
