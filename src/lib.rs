#[macro_use] mod macros;
pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;

#[cfg(test)]
mod test_utils;
