use std::fmt;

use crate::lexer::token_type::TokenType;

#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
}

impl Token {
    pub fn new(token_type: TokenType, literal: String) -> Self {
        Self {
            token_type,
            literal,
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenType::EOF, String::new())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}({:?})", self.token_type, self.literal)
    }
}
