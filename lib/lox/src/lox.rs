use std::io::{self, Write};

use errors::{Diagnostics, Location};
use parser::{AstPrinter, Parser};

/// Scans, parses and prints source text, one independent input at a time.
#[derive(Debug)]
pub struct Lox<E: Write> {
    diagnostics: Diagnostics<E>,
}

impl Lox<io::Stderr> {
    pub fn new() -> Self {
        Self::with_diagnostics(Diagnostics::stderr())
    }
}

impl Default for Lox<io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Write> Lox<E> {
    pub fn with_diagnostics(diagnostics: Diagnostics<E>) -> Self {
        Self { diagnostics }
    }

    /// Writes the printed tree for `source` to `out`, unless an error was reported since the
    /// last [`Lox::reset_error`].
    pub fn run_source(&mut self, source: &str, out: &mut impl Write) -> io::Result<()> {
        let (tokens, scan_errors) = scanner::scan_tokens(source);
        for e in scan_errors {
            self.diagnostics.report(e.line, Location::Nowhere, e.error);
        }

        let expr = Parser::new(tokens).parse(&mut self.diagnostics);

        match expr {
            Some(expr) if !self.had_error() => writeln!(out, "{}", AstPrinter.print(&expr)),
            _ => Ok(()),
        }
    }

    /// Runs one line read from a prompt as an independent input.
    ///
    /// The line terminator is dropped so errors at the end of the line point to line 1, and
    /// the error flag is cleared afterwards so the next line starts fresh.
    pub fn run_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<()> {
        let result = self.run_source(line.trim_end_matches(['\n', '\r']), out);
        self.reset_error();
        result
    }

    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    pub fn reset_error(&mut self) {
        self.diagnostics.reset()
    }

    pub fn diagnostics(&self) -> &Diagnostics<E> {
        &self.diagnostics
    }
}
