use std::{io::{self, Read}, str};
use std::iter::Peekable;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lexer::token::Token;
use crate::lexer::token_type::TokenType;

type FileByte = std::result::Result<u8, io::Error>;

pub struct Lexer<I: Iterator<Item = FileByte>> {
    input: Peekable<I>,
    ch: u8,
    eof: bool,
    keyword_map: HashMap<&'static str, TokenType>,
}

impl<I: Iterator<Item = FileByte>> Iterator for Lexer<I> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token { token_type: TokenType::EOF, .. }) => None,
            Ok(tok) => Some(Ok(tok)),
            Err(e) =>  Some(Err(e)),
        }
    }
}

impl<'a> Lexer<io::Bytes<&'a [u8]>> {
    pub fn from_source(src: &'a str) -> Result<Self> {
        Self::new(src.as_bytes().bytes().peekable())
    }
}

impl<I: Iterator<Item = FileByte>> Lexer<I> {
    pub fn new(mut input: Peekable<I>) -> Result<Self> {
        let (ch, eof) = match input.next() {
            Some(ch) => (ch?, false),
            None => (0, true),
        };

        let lex = Self {
            input,
            ch,
            eof,
            keyword_map: HashMap::new()
        };

        Ok(lex)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.eat_whitespace()?;
        if self.eof {
            return Ok(Token::eof());
        }

        let ch = self.ch;

        let tok = match ch {
            b'=' => {
                let peeked = self.peek_char()?;
                if peeked == b'=' {
                    self.next_char()?;
                    new_token(TokenType::EQ, &[ch, peeked])?
                } else {
                    new_token(TokenType::ASSIGN, &[ch])?
                }
            },
            b';' => new_token(TokenType::SEMICOLON, &[ch])?,
            b':' => new_token(TokenType::COLON, &[ch])?,
            b'(' => new_token(TokenType::LPAREN, &[ch])?,
            b')' => new_token(TokenType::RPAREN, &[ch])?,
            b',' => new_token(TokenType::COMMA, &[ch])?,
            b'+' => new_token(TokenType::PLUS, &[ch])?,
            b'-' => new_token(TokenType::MINUS, &[ch])?,
            b'*' => new_token(TokenType::ASTERISK, &[ch])?,
            b'/' => new_token(TokenType::SLASH, &[ch])?,
            b'<' => new_token(TokenType::LT, &[ch])?,
            b'>' => new_token(TokenType::GT, &[ch])?,
            b'!' => {
                let peeked = self.peek_char()?;
                if peeked == b'=' {
                    self.next_char()?;
                    new_token(TokenType::NOT_EQ, &[ch, peeked])?
                } else {
                    new_token(TokenType::BANG, &[ch])?
                }
            },
            b'{' => new_token(TokenType::LBRACE, &[ch])?,
            b'}' => new_token(TokenType::RBRACE, &[ch])?,
            b'[' => new_token(TokenType::LBRACKET, &[ch])?,
            b']' => new_token(TokenType::RBRACKET, &[ch])?,
            b'"' => {
                let string_lit = self.read_string()?;
                Token::new(TokenType::STRING, string_lit)
            },
            _ => {
                if is_letter(ch) {
                    let ident = self.read_identifier()?;
                    let tok_type = self.lookup_ident(&ident);

                    Token::new(tok_type, ident)
                } else if is_digit(ch) {
                    let num = self.read_number()?;

                    Token::new(TokenType::INT, num)
                } else {
                    Token::new(TokenType::ILLEGAL, illegal_literal(ch))
                }
            },
        };

        self.next_char()?;

        Ok(tok)
    }

    fn eat_whitespace(&mut self) -> Result<()> {
        let mut ch = self.ch;

        while ch == b' ' || ch == b'\t' || ch == b'\n' || ch == b'\r' {
            ch = self.next_char()?;
        }

        Ok(())
    }

    fn next_char(&mut self) -> Result<u8> {
        self.ch = match self.input.next() {
            Some(ch) => ch?,
            None => {
                self.eof = true;
                0
            },
        };
        Ok(self.ch)
    }

    fn peek_char(&mut self) -> Result<u8> {
        match self.input.peek() {
            Some(peeked) => {
                match peeked.as_ref() {
                    Ok(c) => Ok(*c),
                    Err(e) => Err(Error::new(format!("{}", e))),
                }
            },
            None => Ok(0),
        }
    }

    fn read_identifier(&mut self) -> Result<String> {
        let mut ident = Vec::new();
        let mut ch = self.peek_char()?;
        ident.push(self.ch);

        while is_letter(ch) {
            self.next_char()?;
            ident.push(ch);
            ch = self.peek_char()?;
        }

        Ok(String::from_utf8(ident)?)
    }

    fn read_number(&mut self) -> Result<String> {
        let mut num = Vec::new();
        let mut ch = self.peek_char()?;
        num.push(self.ch);

        while is_digit(ch) {
            self.next_char()?;
            num.push(ch);
            ch = self.peek_char()?;
        }

        Ok(String::from_utf8(num)?)
    }

    // Leaves the cursor on the closing quote, or on end of input when the
    // string is unterminated.
    fn read_string(&mut self) -> Result<String> {
        self.next_char()?;
        let mut string_lit = Vec::new();

        while self.ch != b'"' && !self.eof {
            string_lit.push(self.ch);
            self.next_char()?;
        }

        Ok(String::from_utf8(string_lit)?)
    }

    fn lookup_ident(&mut self, ident: &str) -> TokenType {
        if self.keyword_map.is_empty() {
            super::token_type::compute_keyword_map(&mut self.keyword_map);
        }

        match self.keyword_map.get(ident) {
            Some(&tok) => tok,
            None => TokenType::ID,
        }
    }
}

// A lone byte outside printable ASCII is not valid text on its own, so it is
// named by its hex value.
fn illegal_literal(ch: u8) -> String {
    if ch.is_ascii_graphic() {
        (ch as char).to_string()
    } else {
        format!("\\x{:02x}", ch)
    }
}

#[inline]
fn new_token(t: TokenType, literal: &[u8]) -> Result<Token> {
    Ok(Token::new(t, str::from_utf8(literal)?.to_string()))
}

#[inline]
fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

#[inline]
fn is_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}
