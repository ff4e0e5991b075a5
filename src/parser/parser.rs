use std::{iter::Peekable, collections::HashMap};

use tracing::debug;

use crate::{
    lexer::{
        token::Token,
        token_type::TokenType,
    },
    parser::precedence::{self, Precedence},
    error::{Error, Result},
    ast::*,
};

pub struct Parser<I: Iterator<Item = Result<Token>>> {
    l: Peekable<I>,
    tok: Token,
    errors: Vec<String>,
    failure: Option<Error>,
    precedences: HashMap<TokenType, Precedence>,
    prefix_parse_fns: HashMap<TokenType, fn(&mut Self) -> Option<Expr>>,
    infix_parse_fns: HashMap<TokenType, fn(&mut Self, Expr) -> Option<Expr>>,
}

impl<I: Iterator<Item = Result<Token>>> Parser<I> {
    pub fn new(mut l: Peekable<I>) -> Result<Self> {
        let tok = match l.next() {
            Some(t) => t?,
            None => Token::eof(),
        };

        let mut precedences = HashMap::new();
        precedence::compute_precedence_map(&mut precedences);

        let mut p = Self {
            l,
            tok,
            errors: Vec::new(),
            failure: None,
            precedences,
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
        };

        p.register_prefix(TokenType::ID, Self::parse_identifier);
        p.register_prefix(TokenType::INT, Self::parse_integer_literal);
        p.register_prefix(TokenType::STRING, Self::parse_string_literal);
        p.register_prefix(TokenType::TRUE, Self::parse_boolean);
        p.register_prefix(TokenType::FALSE, Self::parse_boolean);
        p.register_prefix(TokenType::BANG, Self::parse_prefix_expression);
        p.register_prefix(TokenType::MINUS, Self::parse_prefix_expression);
        p.register_prefix(TokenType::LPAREN, Self::parse_grouped_expression);
        p.register_prefix(TokenType::IF, Self::parse_if_expression);
        p.register_prefix(TokenType::FUNCTION, Self::parse_function_literal);
        p.register_prefix(TokenType::MACRO, Self::parse_macro_literal);
        p.register_prefix(TokenType::LBRACKET, Self::parse_array_literal);
        p.register_prefix(TokenType::LBRACE, Self::parse_hash_literal);

        let binary = [
            TokenType::PLUS,
            TokenType::MINUS,
            TokenType::SLASH,
            TokenType::ASTERISK,
            TokenType::EQ,
            TokenType::NOT_EQ,
            TokenType::LT,
            TokenType::GT,
        ];
        for tt in binary {
            p.register_infix(tt, Self::parse_infix_expression);
        }
        p.register_infix(TokenType::LPAREN, Self::parse_call_expression);
        p.register_infix(TokenType::LBRACKET, Self::parse_index_expression);

        Ok(p)
    }

    /// Parses the whole token stream. Syntax errors never stop the parse, they
    /// are collected and available from [`Parser::errors`] afterwards. `Err`
    /// is only returned when the lexer itself failed.
    pub fn parse(&mut self) -> Result<Program> {
        let mut program = Program::new();

        while !self.curr_token_is(TokenType::EOF) {
            if let Some(stmt) = self.parse_statement() {
                program.stmts.push(stmt);
            }
            self.next_token();
        }

        if let Some(e) = self.failure.take() {
            return Err(e);
        }

        if !self.errors.is_empty() {
            debug!(count = self.errors.len(), "parsed with syntax errors");
        }

        Ok(program)
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.tok.token_type {
            TokenType::LET => self.parse_let_statement(),
            TokenType::RETURN => self.parse_return_statement(),
            TokenType::SEMICOLON => None,
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        let token = self.tok.clone();

        self.expect_peek(TokenType::ID)?;

        let name = Identifier {
            token: self.tok.clone(),
            value: self.tok.literal.clone(),
        };

        self.expect_peek(TokenType::ASSIGN)?;
        self.next_token();

        let value = self.parse_expression(Precedence::LOWEST)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(
            Stmt::Let(
                LetStatement {
                    token,
                    name,
                    value,
                }
            )
        )
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let token = self.tok.clone();

        self.next_token();

        let retval = self.parse_expression(Precedence::LOWEST)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(
            Stmt::Return(
                ReturnStatement {
                    token,
                    retval,
                }
            )
        )
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.tok.clone();
        let expr = self.parse_expression(Precedence::LOWEST)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        Some(
            Stmt::Expression(
                ExpressionStatement {
                    token,
                    expr,
                }
            )
        )
    }

    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let token = self.tok.clone();
        let mut stmts = Vec::new();

        self.next_token();

        while !self.curr_token_is(TokenType::RBRACE) {
            if self.curr_token_is(TokenType::EOF) {
                self.errors.push(format!(
                    "Expected next token to be {:?}, got {:?} instead.",
                    TokenType::RBRACE,
                    TokenType::EOF,
                ));
                return None;
            }

            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
            self.next_token();
        }

        Some(BlockStatement { token, stmts })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let prefix = match self.prefix_parse_fns.get(&self.tok.token_type) {
            Some(&prefix) => prefix,
            None => {
                self.errors.push(format!("no prefix parse function for {:?} found", self.tok.token_type));
                return None;
            },
        };

        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenType::SEMICOLON) && precedence < self.peek_precedence() {
            let peeked = self.peek_type();
            let infix = match self.infix_parse_fns.get(&peeked) {
                Some(&infix) => infix,
                None => return Some(left),
            };

            self.next_token();

            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(
            Expr::Ident(
                Identifier {
                    token: self.tok.clone(),
                    value: self.tok.literal.clone(),
                }
            )
        )
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let lit = match self.tok.literal.parse::<i64>() {
            Ok(x) => x,
            Err(_) => {
                self.errors.push(format!("could not parse {} as integer", self.tok.literal));
                return None
            },
        };

        Some(
            Expr::Int(
                IntegerLiteral {
                    token: self.tok.clone(),
                    value: lit,
                }
            )
        )
    }

    fn parse_string_literal(&mut self) -> Option<Expr> {
        Some(
            Expr::Str(
                StringLiteral {
                    token: self.tok.clone(),
                    value: self.tok.literal.clone(),
                }
            )
        )
    }

    fn parse_boolean(&mut self) -> Option<Expr> {
        Some(
            Expr::Bool(
                BooleanLiteral {
                    token: self.tok.clone(),
                    value: self.curr_token_is(TokenType::TRUE),
                }
            )
        )
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let token = self.tok.clone();
        let operator = token.literal.clone();

        self.next_token();

        let right = self.parse_expression(Precedence::PREFIX)?;

        Some(
            Expr::Pre(
                Prefix {
                    token,
                    operator,
                    right: Box::new(right),
                }
            )
        )
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.tok.clone();
        let operator = token.literal.clone();
        let precedence = self.curr_precedence();

        self.next_token();

        let right = self.parse_expression(precedence)?;

        Some(
            Expr::In(
                Infix {
                    token,
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                }
            )
        )
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();

        let expr = self.parse_expression(Precedence::LOWEST)?;

        self.expect_peek(TokenType::RPAREN)?;

        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.tok.clone();

        self.expect_peek(TokenType::LPAREN)?;
        self.next_token();

        let condition = self.parse_expression(Precedence::LOWEST)?;

        self.expect_peek(TokenType::RPAREN)?;
        self.expect_peek(TokenType::LBRACE)?;

        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token_is(TokenType::ELSE) {
            self.next_token();
            self.expect_peek(TokenType::LBRACE)?;

            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(
            Expr::If(
                IfExpression {
                    token,
                    condition: Box::new(condition),
                    consequence,
                    alternative,
                }
            )
        )
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.tok.clone();
        let (params, body) = self.parse_params_and_body()?;

        Some(Expr::Fn(FnLiteral { token, params, body }))
    }

    fn parse_macro_literal(&mut self) -> Option<Expr> {
        let token = self.tok.clone();
        let (params, body) = self.parse_params_and_body()?;

        Some(Expr::Macro(MacroLiteral { token, params, body }))
    }

    // `(a, b) { ... }` as shared by `fn` and `macro`.
    fn parse_params_and_body(&mut self) -> Option<(Vec<Identifier>, BlockStatement)> {
        self.expect_peek(TokenType::LPAREN)?;

        let params = self.parse_function_parameters()?;

        self.expect_peek(TokenType::LBRACE)?;

        let body = self.parse_block_statement()?;

        Some((params, body))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();

        if self.peek_token_is(TokenType::RPAREN) {
            self.next_token();
            return Some(params);
        }

        self.expect_peek(TokenType::ID)?;
        params.push(Identifier { token: self.tok.clone(), value: self.tok.literal.clone() });

        while self.peek_token_is(TokenType::COMMA) {
            self.next_token();
            self.expect_peek(TokenType::ID)?;
            params.push(Identifier { token: self.tok.clone(), value: self.tok.literal.clone() });
        }

        self.expect_peek(TokenType::RPAREN)?;

        Some(params)
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let token = self.tok.clone();
        let args = self.parse_expression_list(TokenType::RPAREN)?;

        Some(
            Expr::Call(
                FnCall {
                    token,
                    function: Box::new(function),
                    args,
                }
            )
        )
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.tok.clone();
        let elements = self.parse_expression_list(TokenType::RBRACKET)?;

        Some(Expr::Array(ArrayLiteral { token, elements }))
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.tok.clone();

        self.next_token();

        let index = self.parse_expression(Precedence::LOWEST)?;

        self.expect_peek(TokenType::RBRACKET)?;

        Some(
            Expr::Index(
                IndexOperation {
                    token,
                    left: Box::new(left),
                    index: Box::new(index),
                }
            )
        )
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let token = self.tok.clone();
        let mut pairs = Vec::new();

        while !self.peek_token_is(TokenType::RBRACE) {
            self.next_token();
            let key = self.parse_expression(Precedence::LOWEST)?;

            self.expect_peek(TokenType::COLON)?;
            self.next_token();

            let value = self.parse_expression(Precedence::LOWEST)?;
            pairs.push((key, value));

            if !self.peek_token_is(TokenType::RBRACE) {
                self.expect_peek(TokenType::COMMA)?;
            }
        }

        self.expect_peek(TokenType::RBRACE)?;

        Some(Expr::Hash(HashLiteral { token, pairs }))
    }

    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::LOWEST)?);

        while self.peek_token_is(TokenType::COMMA) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::LOWEST)?);
        }

        self.expect_peek(end)?;

        Some(list)
    }

    // A lexer failure ends the token stream; the error surfaces from `parse`.
    fn next_token(&mut self) {
        self.tok = match self.l.next() {
            Some(Ok(t)) => t,
            Some(Err(e)) => {
                if self.failure.is_none() {
                    self.failure = Some(e);
                }
                Token::eof()
            },
            None => Token::eof(),
        };
    }

    fn expect_peek(&mut self, t: TokenType) -> Option<()> {
        if self.peek_token_is(t) {
            self.next_token();
            Some(())
        } else {
            self.peek_error(t);
            None
        }
    }

    fn curr_token_is(&self, t: TokenType) -> bool {
        self.tok.token_type == t
    }

    fn peek_token_is(&mut self, t: TokenType) -> bool {
        self.peek_type() == t
    }

    fn peek_type(&mut self) -> TokenType {
        match self.l.peek() {
            Some(Ok(tok)) => tok.token_type,
            Some(Err(_)) => TokenType::ILLEGAL,
            None => TokenType::EOF,
        }
    }

    fn peek_precedence(&mut self) -> Precedence {
        let peeked = self.peek_type();
        self.precedences.get(&peeked).copied().unwrap_or(Precedence::LOWEST)
    }

    fn curr_precedence(&self) -> Precedence {
        self.precedences.get(&self.tok.token_type).copied().unwrap_or(Precedence::LOWEST)
    }

    fn peek_error(&mut self, t: TokenType) {
        let actual = self.peek_type();
        let msg = format!("Expected next token to be {:?}, got {:?} instead.", t, actual);
        self.errors.push(msg);
    }

    fn register_prefix(&mut self, tt: TokenType, func: fn(&mut Self) -> Option<Expr>) {
        self.prefix_parse_fns.insert(tt, func);
    }

    fn register_infix(&mut self, tt: TokenType, func: fn(&mut Self, Expr) -> Option<Expr>) {
        self.infix_parse_fns.insert(tt, func);
    }
}
