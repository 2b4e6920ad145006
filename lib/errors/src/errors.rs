use std::io::{self, Write};

use cursor::Line;
use scanner::{Token, TokenType};

/// Where on its line a diagnostic points to.
#[derive(derive_more::Display, Debug, Clone, PartialEq)]
pub enum Location {
    #[display(fmt = "")]
    Nowhere,
    #[display(fmt = " at end")]
    End,
    #[display(fmt = " at '{}'", _0)]
    Lexeme(String),
}

impl From<&Token<'_>> for Location {
    fn from(token: &Token<'_>) -> Self {
        match token.ty() {
            TokenType::Eof => Location::End,
            _ => Location::Lexeme(token.lexeme().to_string()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error{at}: {message}")]
pub struct Diagnostic {
    pub line: Line,
    pub at: Location,
    pub message: String,
}

/// Collects syntax errors and writes each one to an error stream as it arrives.
///
/// `had_error` is sticky until [`Diagnostics::reset`] is called, so callers running several
/// independent inputs (e.g. a prompt) must reset between them.
#[derive(Debug)]
pub struct Diagnostics<W: Write> {
    out: W,
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Diagnostics<W> {
    pub fn new(out: W) -> Self {
        Self { out, diagnostics: Vec::new() }
    }

    pub fn report(&mut self, line: Line, at: Location, message: impl ToString) {
        let diagnostic = Diagnostic { line, at, message: message.to_string() };
        log::debug!("Reporting {:?}", diagnostic);
        if let Err(e) = writeln!(self.out, "{diagnostic}") {
            log::warn!("Failed to write diagnostic: {e}");
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, token: &Token<'_>, message: impl ToString) {
        self.report(token.line(), token.into(), message)
    }

    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn reset(&mut self) {
        self.diagnostics.clear();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
