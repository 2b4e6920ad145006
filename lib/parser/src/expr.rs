use std::fmt::{self, Display, Formatter};

use scanner::Token;

use crate::AstPrinter;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Literal(LiteralValue<'a>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
}

/// One handler per [`Expr`] variant. Adding a variant breaks every implementor until it
/// handles the new case.
pub trait Visitor<'a> {
    type Output;

    fn visit_binary(&mut self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>)
        -> Self::Output;
    fn visit_grouping(&mut self, inner: &Expr<'a>) -> Self::Output;
    fn visit_literal(&mut self, value: &LiteralValue<'a>) -> Self::Output;
    fn visit_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) -> Self::Output;
}

impl<'a> Expr<'a> {
    pub fn accept<V: Visitor<'a>>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Binary { left, operator, right } => visitor.visit_binary(left, operator, right),
            Expr::Grouping(inner) => visitor.visit_grouping(inner),
            Expr::Literal(value) => visitor.visit_literal(value),
            Expr::Unary { operator, right } => visitor.visit_unary(operator, right),
        }
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AstPrinter.print(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl<'a> Display for LiteralValue<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::Str(s) => write!(f, "{s}"),
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}
