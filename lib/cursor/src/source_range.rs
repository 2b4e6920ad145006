use crate::{Col, Cursor, Line};

/// The span of source text covered by a single token.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRange<'a> {
    start: Cursor<'a>,
    end: Cursor<'a>,
}

impl<'a> From<(Cursor<'a>, Cursor<'a>)> for SourceRange<'a> {
    fn from((start, end): (Cursor<'a>, Cursor<'a>)) -> Self {
        Self::new(start, end)
    }
}

impl<'a> SourceRange<'a> {
    pub fn new(start: Cursor<'a>, end: Cursor<'a>) -> Self {
        assert!(start.source == end.source);
        assert!(start.chars.as_str().len() >= end.chars.as_str().len());
        Self { start, end }
    }

    /// Zero-width range sitting at `at`.
    pub fn empty(at: Cursor<'a>) -> Self {
        Self { start: at.clone(), end: at }
    }

    pub fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.end)
    }

    pub fn end(&self) -> &Cursor<'a> {
        &self.end
    }

    pub fn line(&self) -> Line {
        self.start.line()
    }

    pub fn col(&self) -> Col {
        self.start.col()
    }
}
