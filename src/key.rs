//! Dotted key parsing for assignments and table headers.

#[cfg(test)]
#[path = "./key_tests.rs"]
mod tests;

use crate::error::ErrorKind;
use crate::parser::{Parsed, Parser};

/// One or more of `A-Za-z0-9_-`, optionally followed by blanks.
fn is_bare_key_part(part: &str) -> bool {
    let trimmed = part.trim_end_matches([' ', '\t']);
    !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl<'a> Parser<'a> {
    fn find_byte(&self, from: usize, needle: u8) -> Option<usize> {
        let rest = self.bytes.get(from..)?;
        rest.iter().position(|&b| b == needle).map(|idx| from + idx)
    }

    /// Parses the dotted key starting at `ptr` and terminated by `end`
    /// (`=` for assignments, `]` for headers).
    ///
    /// Returns the decoded segments and the offset of the first non-blank
    /// byte after the terminator.
    pub(crate) fn parse_key(&self, ptr: usize, end: u8) -> Parsed<Vec<String>> {
        let Some(mut end_ptr) = self.find_byte(ptr, end) else {
            return Err(self.error(ptr, ErrorKind::IncompleteKey));
        };

        let mut keys = Vec::new();
        let mut pos = ptr;
        loop {
            let c = self.bytes.get(pos).copied();
            let dot = match c {
                Some(b' ' | b'\t') => {
                    pos += 1;
                    if pos < end_ptr {
                        continue;
                    }
                    // Only blanks before the terminator.
                    return Err(self.error(pos, ErrorKind::IllegalKeyChar));
                }
                Some(quote @ (b'"' | b'\'')) => {
                    if self.bytes.get(pos + 1) == Some(&quote)
                        && self.bytes.get(pos + 2) == Some(&quote)
                    {
                        return Err(self.error(pos, ErrorKind::MultilineKeyForbidden));
                    }
                    let Some(eos) = self.get_string_end(pos) else {
                        return Err(self.error(pos, ErrorKind::UnterminatedString));
                    };
                    if end_ptr < eos {
                        end_ptr = match self.find_byte(eos, end) {
                            Some(p) => p,
                            None => return Err(self.error(pos, ErrorKind::IncompleteKey)),
                        };
                    }

                    let dot = self.find_byte(eos, b'.').filter(|&d| d < end_ptr);
                    let trailing = &self.text[eos..dot.unwrap_or(end_ptr)];
                    if let Some(newline) = trailing.find(['\n', '\r']) {
                        return Err(self.error(eos + newline, ErrorKind::NewlineInKey));
                    }
                    if !trailing.trim_start_matches([' ', '\t']).is_empty() {
                        return Err(self.error(eos, ErrorKind::ExtraTokensAfterKey));
                    }

                    keys.push(match self.parse_string(pos, eos) {
                        Ok(s) => s,
                        Err(e) => return Err(e),
                    });
                    dot
                }
                _ => {
                    let dot = self.find_byte(pos, b'.').filter(|&d| d < end_ptr);
                    let part = &self.text[pos..dot.unwrap_or(end_ptr)];
                    if !is_bare_key_part(part) {
                        return Err(self.error(pos, ErrorKind::IllegalKeyChar));
                    }
                    keys.push(part.trim_end_matches([' ', '\t']).to_owned());
                    dot
                }
            };

            match dot {
                Some(dot) => pos = dot + 1,
                None => break,
            }
        }

        match self.skip_void(end_ptr + 1, true, true) {
            Ok(next) => Ok((keys, next)),
            Err(e) => Err(e),
        }
    }
}
