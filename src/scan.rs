//! Offset-driven scanning primitives shared by every layer of the parser.
//!
//! Each function takes a byte offset into the document and returns the
//! advanced offset; nothing here keeps a cursor of its own.

#[cfg(test)]
#[path = "./scan_tests.rs"]
mod tests;

use crate::error::ErrorKind;
use crate::parser::{ParseError, Parser};

#[inline]
pub(crate) fn is_newline_at(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i) {
        Some(b'\n') => true,
        Some(b'\r') => bytes.get(i + 1) == Some(&b'\n'),
        _ => false,
    }
}

impl<'a> Parser<'a> {
    /// Returns `true` when the byte at `ptr` is preceded by an odd run of
    /// backslashes.
    pub(crate) fn is_escaped(&self, ptr: usize) -> bool {
        let mut run = 0;
        while run < ptr && self.bytes[ptr - run - 1] == b'\\' {
            run += 1;
        }
        run % 2 == 1
    }

    /// Offset of the next line break at or after `start`, pointing at the
    /// `\r` of a `\r\n` pair.
    pub(crate) fn index_of_newline(&self, start: usize) -> Option<usize> {
        let rest = self.bytes.get(start..)?;
        let idx = start + rest.iter().position(|&b| b == b'\n')?;
        if idx > start && self.bytes[idx - 1] == b'\r' {
            Some(idx - 1)
        } else {
            Some(idx)
        }
    }

    /// Skips a comment starting at `ptr`, returning the offset of the line
    /// break ending it (or the end of input).
    pub(crate) fn skip_comment(&self, ptr: usize) -> Result<usize, ParseError> {
        let mut i = ptr;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\n' => return Ok(i),
                b'\r' if self.bytes.get(i + 1) == Some(&b'\n') => return Ok(i + 1),
                b'\t' => {}
                0..=0x1f | 0x7f => {
                    return Err(self.error(i, ErrorKind::ControlCharInComment));
                }
                _ => {}
            }
            i += 1;
        }
        Ok(self.bytes.len())
    }

    /// Skips spaces and tabs, plus line breaks unless `ban_newlines` and
    /// comments unless `ban_comments`.
    pub(crate) fn skip_void(
        &self,
        mut ptr: usize,
        ban_newlines: bool,
        ban_comments: bool,
    ) -> Result<usize, ParseError> {
        loop {
            match self.bytes.get(ptr) {
                Some(b' ' | b'\t') => ptr += 1,
                Some(b'\n') if !ban_newlines => ptr += 1,
                Some(b'\r') if !ban_newlines && is_newline_at(self.bytes, ptr) => ptr += 2,
                Some(b'#') if !ban_comments => ptr = self.skip_comment(ptr)?,
                _ => return Ok(ptr),
            }
        }
    }

    /// Scans for `sep` or `end`, jumping over comments.
    ///
    /// Returns the offset just past `sep`, or the offset of `end` (or of a
    /// line break when `ban_newlines`). Without an `end` the offset of the
    /// next line break is returned.
    pub(crate) fn skip_until(
        &self,
        ptr: usize,
        sep: u8,
        end: Option<u8>,
        ban_newlines: bool,
    ) -> Result<usize, ParseError> {
        let len = self.bytes.len();
        let Some(end) = end else {
            return Ok(self.index_of_newline(ptr).unwrap_or(len));
        };
        let mut i = ptr;
        while i < len {
            let c = self.bytes[i];
            if c == b'#' {
                match self.index_of_newline(i) {
                    Some(newline) => i = newline,
                    None => break,
                }
            } else if c == sep {
                return Ok(i + 1);
            } else if c == end || (ban_newlines && is_newline_at(self.bytes, i)) {
                return Ok(i);
            }
            i += 1;
        }
        Err(self.error(ptr, ErrorKind::UnterminatedStructure))
    }

    /// Finds the offset just past the closing delimiter of the string whose
    /// opening quote is at `seek`.
    ///
    /// Closing quotes of a triple-quoted string may be followed by up to two
    /// more quotes that belong to the content.
    pub(crate) fn get_string_end(&self, seek: usize) -> Option<usize> {
        let first = *self.bytes.get(seek)?;
        let triple = self.bytes.get(seek + 1) == Some(&first)
            && self.bytes.get(seek + 2) == Some(&first);
        let width = if triple { 3 } else { 1 };
        let target = &self.text[seek..seek + width];

        let mut pos = seek + width - 1;
        loop {
            pos = pos + 1 + self.text[pos + 1..].find(target)?;
            if first == b'\'' || !self.is_escaped(pos) {
                break;
            }
        }

        pos += width;
        if triple {
            for _ in 0..2 {
                if self.bytes.get(pos) == Some(&first) {
                    pos += 1;
                }
            }
        }
        Some(pos)
    }
}
