//! Byte ranges into the parsed document.

#[cfg(test)]
#[path = "./span_tests.rs"]
mod tests;

/// Byte range of the source text an [`Error`](crate::Error) points at.
///
/// Offsets are stored as `u32`; documents are limited to 4 GiB.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// The single byte under the cursor at `offset`.
    #[inline]
    pub(crate) fn at(offset: usize) -> Self {
        Self::between(offset, offset + 1)
    }

    /// Span between two cursor offsets.
    #[inline]
    pub(crate) fn between(start: usize, end: usize) -> Self {
        Self::new(start as u32, end as u32)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The covered text of `source`, clamped to its end.
    ///
    /// Returns `None` when the span does not fall on character boundaries of
    /// `source`, which happens when it came from a different document.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        let end = (self.end as usize).min(source.len());
        let start = (self.start as usize).min(end);
        source.get(start..end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(s: Span) -> Self {
        s.start as usize..s.end as usize
    }
}
