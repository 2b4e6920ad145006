mod expr;
mod printer;

use std::io::Write;

use cursor::{Cursor, SourceRange};
use errors::Diagnostics;
use log::trace;
use scanner::{Token, TokenData, TokenType};

pub use expr::{Expr, LiteralValue, Visitor};
pub use printer::AstPrinter;

use TokenType::*;

pub type Result<'a, T> = std::result::Result<T, ParseError<'a>>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ParseError<'a> {
    pub error: ParseErrorType,
    pub token: Token<'a>,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after {0}.")]
    ExpectedRightParen(&'static str),
}

impl ParseErrorType {
    fn at<'a>(self, token: &Token<'a>) -> ParseError<'a> {
        ParseError { error: self, token: token.clone() }
    }
}

/// Recursive descent parser for the expression grammar:
///
/// ```text
/// expression → equality
/// equality   → comparison ( ( "!=" | "==" ) comparison )*
/// comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term       → factor ( ( "-" | "+" ) factor )*
/// factor     → unary ( ( "/" | "*" ) unary )*
/// unary      → ( "!" | "-" ) unary | primary
/// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    // Always indexes a valid token, since `tokens` ends with `Eof` and we never advance past it.
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if tokens.last().map(Token::ty) != Some(Eof) {
            let at = match tokens.last() {
                Some(last) => last.range.end().clone(),
                None => Cursor::new(""),
            };
            tokens.push(Token::eof(SourceRange::empty(at)));
        }
        Self { tokens, current: 0 }
    }

    /// Parses a single expression, reporting a failure to `diagnostics`.
    ///
    /// Tokens after a complete expression are left unconsumed.
    pub fn parse<W: Write>(mut self, diagnostics: &mut Diagnostics<W>) -> Option<Expr<'a>> {
        match self.expression() {
            Ok(expr) => {
                log::debug!("Parsed expression: {expr}");
                Some(expr)
            }
            Err(e) => {
                trace!("Hit error at {}:{}: {}", e.token.line(), e.token.col(), e.error);
                diagnostics.error(&e.token, e.error);
                None
            }
        }
    }

    pub fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[BangEqual, EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[Greater, GreaterEqual, Less, LessEqual], Self::term)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[Minus, Plus], Self::factor)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        self.left_associative(&[Slash, Star], Self::unary)
    }

    /// `operand ( operators operand )*`, folded to the left.
    fn left_associative(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<'a, Expr<'a>>,
    ) -> Result<'a, Expr<'a>> {
        let mut expr = operand(self)?;

        while self.matches(operators) {
            let operator = self.previous().clone();
            trace!("Binary operator {} at {}:{}", operator, operator.line(), operator.col());
            let right = Box::new(operand(self)?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if self.matches(&[Bang, Minus]) {
            let operator = self.previous().clone();
            let right = Box::new(self.unary()?);
            return Ok(Expr::Unary { operator, right });
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        trace!("Parsing primary at {:?}", self.peek());
        let literal = match self.peek().data.clone() {
            TokenData::False => LiteralValue::Boolean(false),
            TokenData::True => LiteralValue::Boolean(true),
            TokenData::Nil => LiteralValue::Nil,
            TokenData::Number(n) => LiteralValue::Number(n),
            TokenData::Str(s) => LiteralValue::Str(s),
            TokenData::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(RightParen, ParseErrorType::ExpectedRightParen("expression"))?;
                return Ok(Expr::Grouping(Box::new(expr)));
            }
            _ => return Err(ParseErrorType::ExpectedExpression.at(self.peek())),
        };

        self.advance();
        Ok(Expr::Literal(literal))
    }

    /// Skips tokens until just after a `;` or right before a token that starts a statement.
    ///
    /// Expressions have no boundaries to recover at, so nothing calls this yet.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().ty() == Semicolon {
                return;
            }

            match self.peek().ty() {
                Class | Fun | Var | For | If | While | Print | Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    /// Consumes the current token unless it is `Eof`, returning the last consumed token.
    fn advance(&mut self) -> &Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    /// The most recently consumed token, or the first one if nothing was consumed yet.
    fn previous(&self) -> &Token<'a> {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn check(&self, token_type: TokenType) -> bool {
        !self.is_at_end() && self.peek().ty() == token_type
    }

    fn matches(&mut self, token_types: &[TokenType]) -> bool {
        if token_types.iter().any(|&ty| self.check(ty)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty() == Eof
    }

    fn consume(&mut self, token_type: TokenType, error: ParseErrorType) -> Result<'a, Token<'a>> {
        if self.check(token_type) {
            Ok(self.advance().clone())
        } else {
            Err(error.at(self.peek()))
        }
    }
}
