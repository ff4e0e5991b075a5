use std::collections::HashMap;

#[allow(non_camel_case_types)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum TokenType {
    ILLEGAL,
    EOF,

    // Identifiers + literals
    ID,
    INT,
    STRING,

    // Operators
    ASSIGN,
    PLUS,
    MINUS,
    BANG,
    ASTERISK,
    SLASH,

    LT,
    GT,

    EQ,
    NOT_EQ,

    // Delimiters
    COMMA,
    SEMICOLON,
    COLON,

    LPAREN,
    RPAREN,
    LBRACE,
    RBRACE,
    LBRACKET,
    RBRACKET,

    // Keywords
    FUNCTION,
    LET,
    RETURN,
    IF,
    ELSE,
    TRUE,
    FALSE,
    MACRO,
}

pub fn compute_keyword_map(map: &mut HashMap<&'static str, TokenType>) {
    let keywords = [
        ("fn", TokenType::FUNCTION),
        ("let", TokenType::LET),
        ("return", TokenType::RETURN),
        ("if", TokenType::IF),
        ("else", TokenType::ELSE),
        ("true", TokenType::TRUE),
        ("false", TokenType::FALSE),
        ("macro", TokenType::MACRO),
    ];

    for t in keywords {
        map.insert(t.0, t.1);
    };
}
