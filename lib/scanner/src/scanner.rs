use cursor::{Cursor, Line, SourceRange};
use itertools::{Either, Itertools};

pub mod token;
pub use token::{Token, TokenData, TokenType};

use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

/// Lazily scans `source`, yielding a single `Eof` token once the input is exhausted.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    cursor: Cursor<'a>,
    emitted_eof: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), emitted_eof: false }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(' ' | '\r' | '\t' | '\n') => {
                    self.cursor.next();
                }
                Some('/') if self.cursor.peek_next() == Some('/') => {
                    self.cursor.advance_while(|c| c != '\n');
                }
                _ => return,
            }
        }
    }

    fn make_token(&self, data: TokenData<'a>, start: Cursor<'a>) -> Token<'a> {
        Token::new(data, (start, self.cursor.clone()))
    }

    fn either(
        &mut self,
        expected: char,
        then: TokenData<'a>,
        otherwise: TokenData<'a>,
    ) -> TokenData<'a> {
        if self.cursor.next_if_eq(expected) {
            then
        } else {
            otherwise
        }
    }

    fn scan_token(&mut self, c: char, start: Cursor<'a>) -> Result<Token<'a>, ScanError> {
        let data = match c {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => Minus,
            '+' => Plus,
            ';' => Semicolon,
            '*' => Star,
            '/' => Slash,
            '!' => self.either('=', BangEqual, Bang),
            '=' => self.either('=', EqualEqual, Equal),
            '<' => self.either('=', LessEqual, Less),
            '>' => self.either('=', GreaterEqual, Greater),
            '"' => return self.string(start),
            c if c.is_ascii_digit() => return Ok(self.number(start)),
            c if c.is_ascii_alphabetic() || c == '_' => return Ok(self.identifier(start)),
            c => {
                return Err(ScanError {
                    error: ScanErrorType::UnexpectedCharacter(c),
                    line: start.line(),
                })
            }
        };
        Ok(self.make_token(data, start))
    }

    fn string(&mut self, start: Cursor<'a>) -> Result<Token<'a>, ScanError> {
        self.cursor.advance_while(|c| c != '"');
        if !self.cursor.next_if_eq('"') {
            return Err(ScanError {
                error: ScanErrorType::UnterminatedString,
                line: self.cursor.line(),
            });
        }

        let lexeme = start.slice_until(&self.cursor);
        Ok(self.make_token(Str(&lexeme[1..lexeme.len() - 1]), start))
    }

    fn number(&mut self, start: Cursor<'a>) -> Token<'a> {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        let value = start
            .slice_until(&self.cursor)
            .parse()
            .expect("digits with an optional fraction always form a valid f64");
        self.make_token(Number(value), start)
    }

    fn identifier(&mut self, start: Cursor<'a>) -> Token<'a> {
        self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let data = TokenData::keyword(start.slice_until(&self.cursor)).unwrap_or(Identifier);
        self.make_token(data, start)
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace_and_comments();

        let start = self.cursor.clone();
        if self.cursor.is_at_end() {
            if self.emitted_eof {
                return None;
            }
            self.emitted_eof = true;
            return Some(Ok(Token::eof(SourceRange::empty(start))));
        }

        let c = self.cursor.next()?;
        Some(self.scan_token(c, start))
    }
}

/// Scans all of `source`, keeping going after errors. The returned tokens always end with `Eof`.
pub fn scan_tokens(source: &str) -> (Vec<Token<'_>>, Vec<ScanError>) {
    TokenStream::new(source).partition_map(|result| match result {
        Ok(token) => Either::Left(token),
        Err(error) => Either::Right(error),
    })
}

#[cfg(test)]
mod tests {
    use cursor::Col;
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(source: &str) -> Vec<(TokenType, &str)> {
        let (tokens, errors) = scan_tokens(source);
        assert_eq!(errors, vec![]);
        tokens.iter().map(|t| (t.ty(), t.lexeme())).collect_vec()
    }

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            scan("(){},.-+;*/"),
            vec![
                (TokenType::LeftParen, "("),
                (TokenType::RightParen, ")"),
                (TokenType::LeftBrace, "{"),
                (TokenType::RightBrace, "}"),
                (TokenType::Comma, ","),
                (TokenType::Dot, "."),
                (TokenType::Minus, "-"),
                (TokenType::Plus, "+"),
                (TokenType::Semicolon, ";"),
                (TokenType::Star, "*"),
                (TokenType::Slash, "/"),
                (TokenType::Eof, ""),
            ]
        );
    }

    #[test]
    fn two_char_tokens() {
        assert_eq!(
            scan("! != = == < <= > >="),
            vec![
                (TokenType::Bang, "!"),
                (TokenType::BangEqual, "!="),
                (TokenType::Equal, "="),
                (TokenType::EqualEqual, "=="),
                (TokenType::Less, "<"),
                (TokenType::LessEqual, "<="),
                (TokenType::Greater, ">"),
                (TokenType::GreaterEqual, ">="),
                (TokenType::Eof, ""),
            ]
        );
    }

    #[test]
    fn literals() {
        let (tokens, _) = scan_tokens("123 45.67 \"hello world\" 1.");
        let data = tokens.into_iter().map(|t| t.data).collect_vec();
        assert_eq!(
            data,
            vec![Number(123.0), Number(45.67), Str("hello world"), Number(1.0), Dot, Eof]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            scan("true false nil orchid or _x1"),
            vec![
                (TokenType::True, "true"),
                (TokenType::False, "false"),
                (TokenType::Nil, "nil"),
                (TokenType::Identifier, "orchid"),
                (TokenType::Or, "or"),
                (TokenType::Identifier, "_x1"),
                (TokenType::Eof, ""),
            ]
        );
    }

    #[test]
    fn comments_and_lines() {
        let (tokens, _) = scan_tokens("1 // comment\n+\n\"a\nb\" 2");
        let lines = tokens.iter().map(|t| (t.lexeme(), t.line())).collect_vec();
        assert_eq!(
            lines,
            vec![
                ("1", Line(1)),
                ("+", Line(2)),
                ("\"a\nb\"", Line(3)),
                ("2", Line(4)),
                ("", Line(4)),
            ]
        );
    }

    #[test]
    fn token_columns() {
        let (tokens, _) = scan_tokens("1 +\n  foo");
        let positions = tokens.iter().map(|t| (t.lexeme(), t.line(), t.col())).collect_vec();
        assert_eq!(
            positions,
            vec![
                ("1", Line(1), Col(1)),
                ("+", Line(1), Col(3)),
                ("foo", Line(2), Col(3)),
                ("", Line(2), Col(6)),
            ]
        );
    }

    #[test]
    fn errors_do_not_stop_scanning() {
        let (tokens, errors) = scan_tokens("1 @\n$ 2 \"open");
        assert_eq!(
            errors,
            vec![
                ScanError { error: ScanErrorType::UnexpectedCharacter('@'), line: Line(1) },
                ScanError { error: ScanErrorType::UnexpectedCharacter('$'), line: Line(2) },
                ScanError { error: ScanErrorType::UnterminatedString, line: Line(2) },
            ]
        );
        assert_eq!(
            tokens.iter().map(|t| t.ty()).collect_vec(),
            vec![TokenType::Number, TokenType::Number, TokenType::Eof]
        );
        assert_eq!(errors[0].to_string(), "[line 1] Error: Unexpected character.");
    }

    #[test]
    fn eof_is_emitted_once() {
        let mut stream = TokenStream::new("");
        assert_eq!(stream.next().map(|t| t.map(|t| t.ty())), Some(Ok(TokenType::Eof)));
        assert_eq!(stream.next(), None);

        let stream = TokenStream::new("1 // trailing\n\t");
        assert_eq!(
            stream.map(|t| t.map(|t| t.ty())).collect_vec(),
            vec![Ok(TokenType::Number), Ok(TokenType::Eof)]
        );
    }
}
