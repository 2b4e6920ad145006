use scanner::Token;

use crate::{Expr, LiteralValue, Visitor};

/// Renders a tree in fully parenthesized prefix form, e.g. `(* (- 123) (group 45.67))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr<'_>) -> String {
        expr.accept(self)
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr<'_>]) -> String {
        let mut out = format!("({name}");
        for expr in exprs {
            out.push(' ');
            out.push_str(&expr.accept(self));
        }
        out.push(')');
        out
    }
}

impl<'a> Visitor<'a> for AstPrinter {
    type Output = String;

    fn visit_binary(&mut self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[left, right])
    }

    fn visit_grouping(&mut self, inner: &Expr<'a>) -> String {
        self.parenthesize("group", &[inner])
    }

    fn visit_literal(&mut self, value: &LiteralValue<'a>) -> String {
        value.to_string()
    }

    fn visit_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[right])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scanner::scan_tokens;

    use super::*;

    #[test]
    fn hand_built_tree() {
        let (tokens, _) = scan_tokens("- *");
        let (minus, star) = (tokens[0].clone(), tokens[1].clone());

        let expr = Expr::Binary {
            left: Box::new(Expr::Unary {
                operator: minus,
                right: Box::new(Expr::Literal(LiteralValue::Number(123.0))),
            }),
            operator: star,
            right: Box::new(Expr::Grouping(Box::new(Expr::Literal(LiteralValue::Number(45.67))))),
        };

        assert_eq!(AstPrinter.print(&expr), "(* (- 123) (group 45.67))");
        assert_eq!(expr.to_string(), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn printing_is_repeatable() {
        let expr = Expr::Grouping(Box::new(Expr::Literal(LiteralValue::Nil)));
        let mut printer = AstPrinter;
        assert_eq!(printer.print(&expr), "(group nil)");
        assert_eq!(printer.print(&expr), printer.print(&expr));
    }
}
