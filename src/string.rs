//! Decoding of the four TOML string forms.

#[cfg(test)]
#[path = "./string_tests.rs"]
mod tests;

use crate::error::ErrorKind;
use crate::parser::{ParseError, Parser};
use crate::scan::is_newline_at;

impl<'a> Parser<'a> {
    /// Decodes the string whose opening quote is at `ptr` and whose closing
    /// delimiter ends just before `end_ptr`.
    pub(crate) fn parse_string(&self, ptr: usize, end_ptr: usize) -> Result<String, ParseError> {
        let bytes = self.bytes;
        let quote = bytes[ptr];
        let literal = quote == b'\'';
        let multiline = bytes.get(ptr + 1) == Some(&quote) && bytes.get(ptr + 2) == Some(&quote);

        let mut i = ptr + 1;
        let content_end = if multiline {
            i += 2;
            if bytes.get(i) == Some(&b'\n') {
                i += 1;
            } else if bytes.get(i) == Some(&b'\r') && bytes.get(i + 1) == Some(&b'\n') {
                i += 2;
            }
            end_ptr - 3
        } else {
            end_ptr - 1
        };

        let mut out = String::with_capacity(content_end.saturating_sub(i));
        let mut flushed = i;

        while i < content_end {
            let c = bytes[i];
            match c {
                b'\n' if !multiline => {
                    return Err(self.error(i, ErrorKind::UnterminatedLine));
                }
                b'\r' if !multiline && is_newline_at(bytes, i) => {
                    return Err(self.error(i, ErrorKind::UnterminatedLine));
                }
                b'\n' => i += 1,
                b'\r' if is_newline_at(bytes, i) => i += 2,
                b'\t' => i += 1,
                0..=0x1f | 0x7f => {
                    return Err(self.error(i, ErrorKind::IllegalControlCharacter));
                }
                b'\\' if !literal => {
                    out.push_str(&self.text[flushed..i]);
                    i = self.parse_escape(i, content_end, multiline, &mut out)?;
                    flushed = i;
                }
                _ => i += 1,
            }
        }
        out.push_str(&self.text[flushed..content_end]);
        Ok(out)
    }

    /// Decodes the escape sequence whose backslash is at `start`, appending
    /// to `out`. Returns the offset past the sequence.
    fn parse_escape(
        &self,
        start: usize,
        content_end: usize,
        multiline: bool,
        out: &mut String,
    ) -> Result<usize, ParseError> {
        let bytes = self.bytes;
        let Some(&c) = bytes.get(start + 1).filter(|_| start + 1 < content_end) else {
            return Err(self.error(start, ErrorKind::InvalidEscape));
        };
        let simple = match c {
            b'b' => Some('\u{8}'),
            b't' => Some('\t'),
            b'n' => Some('\n'),
            b'f' => Some('\u{c}'),
            b'r' => Some('\r'),
            b'"' => Some('"'),
            b'\\' => Some('\\'),
            _ => None,
        };
        if let Some(ch) = simple {
            out.push(ch);
            return Ok(start + 2);
        }

        match c {
            b'u' | b'U' => {
                let digits = if c == b'u' { 4 } else { 8 };
                let hex_start = start + 2;
                let hex_end = hex_start + digits;
                if hex_end > content_end {
                    return Err(self.error(start, ErrorKind::InvalidUnicodeEscape));
                }
                let hex = &bytes[hex_start..hex_end];
                if !hex.iter().all(u8::is_ascii_hexdigit) {
                    return Err(self.error(start, ErrorKind::InvalidUnicodeEscape));
                }
                let code = std::str::from_utf8(hex)
                    .ok()
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .and_then(char::from_u32);
                match code {
                    Some(ch) => {
                        out.push(ch);
                        Ok(hex_end)
                    }
                    None => Err(self.error(start, ErrorKind::InvalidUnicodeEscape)),
                }
            }
            b' ' | b'\t' | b'\n' | b'\r' if multiline => {
                self.skip_line_continuation(start, content_end)
            }
            b'\n' => Err(self.error(start, ErrorKind::UnterminatedLine)),
            b'\r' if is_newline_at(bytes, start + 1) => {
                Err(self.error(start, ErrorKind::UnterminatedLine))
            }
            _ => Err(self.error(start, ErrorKind::UnknownEscape(self.char_at(start + 1)))),
        }
    }

    /// A backslash at the end of a line trims it together with all the
    /// whitespace that follows.
    fn skip_line_continuation(&self, start: usize, content_end: usize) -> Result<usize, ParseError> {
        let bytes = self.bytes;
        let mut i = start + 1;
        while i < content_end && matches!(bytes[i], b' ' | b'\t') {
            i += 1;
        }
        if !is_newline_at(bytes, i) || i >= content_end {
            return Err(self.error(start, ErrorKind::InvalidEscape));
        }
        while i < content_end {
            match bytes[i] {
                b' ' | b'\t' | b'\n' => i += 1,
                b'\r' if is_newline_at(bytes, i) => i += 2,
                _ => break,
            }
        }
        Ok(i)
    }
}
