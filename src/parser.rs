// Avoid `?` in the recursive value parsers: explicit matches keep the error
// path out of line and the hot path free of From conversions.
#![allow(clippy::question_mark)]

use crate::{
    Array, ParseOptions, Span, Table, Value,
    error::{Error, ErrorKind},
    meta::{self, Conflict, MetaMap},
    scan::is_newline_at,
};

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

// ---------------------------------------------------------------------------
// Lightweight internal error. Line, column and snippet are only computed
// once, when the error leaves the crate.
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ParseError {
    pub(crate) kind: ErrorKind,
    pub(crate) span: Span,
}

/// A parsed fragment and the offset just past it.
pub(crate) type Parsed<T> = Result<(T, usize), ParseError>;

pub(crate) struct Parser<'a> {
    pub(crate) text: &'a str,
    /// Raw bytes of the input. Always valid UTF-8 (derived from `&str`).
    pub(crate) bytes: &'a [u8],
    pub(crate) options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, options: &'a ParseOptions) -> Self {
        Parser {
            text,
            bytes: text.as_bytes(),
            options,
        }
    }

    // -- error helpers ------------------------------------------------------

    #[cold]
    pub(crate) fn error(&self, ptr: usize, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            span: Span::at(ptr),
        }
    }

    #[cold]
    fn error_spanned(&self, start: usize, end: usize, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            span: Span::between(start, end),
        }
    }

    /// The character starting at `ptr`, for diagnostics.
    pub(crate) fn char_at(&self, ptr: usize) -> char {
        self.text
            .get(ptr..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0')
    }

    // -- value parsing ------------------------------------------------------

    /// Parses the value at `ptr`.
    ///
    /// `end` is the closing delimiter of the enclosing container, or `None`
    /// for a top-level assignment. Inside a container the returned offset is
    /// past the separating comma, or at `end`.
    pub(crate) fn extract_value(&self, ptr: usize, end: Option<u8>, depth: usize) -> Parsed<Value> {
        if depth == 0 {
            return Err(self.error(ptr, ErrorKind::MaxDepthExceeded));
        }

        match self.bytes.get(ptr) {
            Some(b'[') => {
                let (array, next) = match self.parse_array(ptr, depth) {
                    Ok(v) => v,
                    Err(e) => return Err(e),
                };
                match self.finish_value(next, end) {
                    Ok(next) => Ok((Value::Array(array), next)),
                    Err(e) => Err(e),
                }
            }
            Some(b'{') => {
                let (table, next) = match self.parse_inline_table(ptr, depth) {
                    Ok(v) => v,
                    Err(e) => return Err(e),
                };
                match self.finish_value(next, end) {
                    Ok(next) => Ok((Value::Table(table), next)),
                    Err(e) => Err(e),
                }
            }
            Some(b'"' | b'\'') => {
                let Some(string_end) = self.get_string_end(ptr) else {
                    return Err(self.error(ptr, ErrorKind::UnterminatedString));
                };
                let string = match self.parse_string(ptr, string_end) {
                    Ok(s) => s,
                    Err(e) => return Err(e),
                };
                match self.finish_value(string_end, end) {
                    Ok(next) => Ok((Value::String(string), next)),
                    Err(e) => Err(e),
                }
            }
            _ => self.extract_scalar(ptr, end),
        }
    }

    /// Checks what follows a string or container inside another container.
    fn finish_value(&self, ptr: usize, end: Option<u8>) -> Result<usize, ParseError> {
        let Some(end) = end else {
            return Ok(ptr);
        };
        let inline_table = end == b'}';
        let ptr = match self.skip_void(ptr, inline_table, inline_table) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };
        match self.bytes.get(ptr) {
            None => Ok(ptr),
            Some(b',') => Ok(ptr + 1),
            Some(&c) if c == end => Ok(ptr),
            Some(b'#') if inline_table => Err(self.error(ptr, ErrorKind::CommentInInlineTable)),
            Some(b'\n' | b'\r') if inline_table => {
                Err(self.error(ptr, ErrorKind::NewlineInInlineTable))
            }
            Some(_) => Err(self.error(ptr, ErrorKind::UnexpectedCharacter(self.char_at(ptr)))),
        }
    }

    /// Parses a bare literal: boolean, number or date/time.
    fn extract_scalar(&self, ptr: usize, end: Option<u8>) -> Parsed<Value> {
        let stop = match self.skip_until(ptr, b',', end, false) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };
        let raw_end = if end.is_some() && stop > ptr && self.bytes[stop - 1] == b',' {
            stop - 1
        } else {
            stop
        };
        let mut raw = &self.text[ptr..raw_end];

        let comment = raw.find('#').map(|idx| ptr + idx);
        if let Some(comment) = comment {
            if end == Some(b'}') {
                return Err(self.error(comment, ErrorKind::CommentInInlineTable));
            }
            if let Err(e) = self.skip_comment(comment) {
                return Err(e);
            }
            raw = &self.text[ptr..comment];
        }
        if end == Some(b'}') {
            if let Some(idx) = raw.find(['\n', '\r']) {
                return Err(self.error(ptr + idx, ErrorKind::NewlineInInlineTable));
            }
        }

        let literal = raw.trim_end_matches([' ', '\t', '\r', '\n']);
        if literal.is_empty() {
            return Err(self.error(ptr, ErrorKind::MissingValue));
        }
        let value = match self.parse_literal(literal, ptr) {
            Ok(v) => v,
            Err(e) => return Err(e),
        };

        match comment {
            Some(comment) if end.is_some() => match self.finish_value(comment, end) {
                Ok(next) => Ok((value, next)),
                Err(e) => Err(e),
            },
            _ => Ok((value, stop)),
        }
    }

    fn parse_array(&self, start: usize, depth: usize) -> Parsed<Array> {
        let mut array = Array::new();
        let mut ptr = start + 1;
        loop {
            let Some(&c) = self.bytes.get(ptr) else {
                return Err(self.error(start, ErrorKind::UnterminatedArray));
            };
            match c {
                b']' => return Ok((array, ptr + 1)),
                b',' => return Err(self.error(ptr, ErrorKind::UnexpectedComma)),
                b'#' => {
                    ptr = match self.skip_comment(ptr) {
                        Ok(p) => p,
                        Err(e) => return Err(e),
                    };
                }
                b' ' | b'\t' | b'\n' | b'\r' => ptr += 1,
                _ => {
                    let (value, next) = match self.extract_value(ptr, Some(b']'), depth - 1) {
                        Ok(v) => v,
                        Err(e) => return Err(e),
                    };
                    array.push(value);
                    ptr = next;
                }
            }
        }
    }

    fn parse_inline_table(&self, start: usize, depth: usize) -> Parsed<Table> {
        let mut table = Table::new();
        let mut meta = MetaMap::default();
        let mut trailing_comma = None;
        let mut ptr = start + 1;
        loop {
            let Some(&c) = self.bytes.get(ptr) else {
                return Err(self.error(start, ErrorKind::UnterminatedInlineTable));
            };
            match c {
                b'}' => break,
                b'\n' | b'\r' => return Err(self.error(ptr, ErrorKind::NewlineInInlineTable)),
                b'#' => return Err(self.error(ptr, ErrorKind::CommentInInlineTable)),
                b',' => return Err(self.error(ptr, ErrorKind::UnexpectedComma)),
                b' ' | b'\t' => ptr += 1,
                _ => {
                    let (mut keys, value_start) = match self.parse_key(ptr, b'=') {
                        Ok(v) => v,
                        Err(e) => return Err(e),
                    };
                    let target = match meta::declare_key(&keys, &mut table, &mut meta) {
                        Ok(t) => t,
                        Err(conflict) => {
                            return Err(self.key_conflict(ptr, value_start, &keys, conflict));
                        }
                    };
                    let (value, next) =
                        match self.extract_value(value_start, Some(b'}'), depth - 1) {
                            Ok(v) => v,
                            Err(e) => return Err(e),
                        };
                    if let Some(name) = keys.pop() {
                        target.push_unchecked(name, value);
                    }
                    ptr = next;
                    trailing_comma = (self.bytes[ptr - 1] == b',').then_some(ptr - 1);
                }
            }
        }
        if let Some(comma) = trailing_comma {
            return Err(self.error(comma, ErrorKind::TrailingComma));
        }
        Ok((table, ptr + 1))
    }

    fn key_conflict(&self, start: usize, end: usize, keys: &[String], conflict: Conflict) -> ParseError {
        let key = keys.join(".");
        let kind = match conflict {
            Conflict::Redefined => ErrorKind::DuplicateKey { key },
            Conflict::Closed => ErrorKind::DottedKeyIntoTable { key },
        };
        self.error_spanned(start, end, kind)
    }

    fn table_conflict(&self, start: usize, end: usize, keys: &[String], array: bool) -> ParseError {
        let name = keys.join(".");
        let kind = if array {
            ErrorKind::RedefineAsArray { name }
        } else {
            ErrorKind::DuplicateTable { name }
        };
        self.error_spanned(start, end, kind)
    }

    // -- document driver ----------------------------------------------------

    fn parse_document(&self) -> Result<Table, ParseError> {
        let mut root = Table::new();
        let mut root_meta = MetaMap::default();
        let mut current: &mut Table = &mut root;
        let mut current_meta: &mut MetaMap = &mut root_meta;

        let mut ptr = match self.skip_void(0, false, false) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };
        while ptr < self.bytes.len() {
            if self.bytes[ptr] == b'[' {
                let header_start = ptr;
                let array = self.bytes.get(ptr + 1) == Some(&b'[');
                let key_start = ptr + if array { 2 } else { 1 };
                let (keys, mut next) = match self.parse_key(key_start, b']') {
                    Ok(v) => v,
                    Err(e) => return Err(e),
                };
                if array {
                    if self.bytes[next - 1] != b']' || self.bytes.get(next) != Some(&b']') {
                        return Err(self.error(next, ErrorKind::ExpectedTableEnd));
                    }
                    next += 1;
                }
                match meta::declare_table(&keys, &mut root, &mut root_meta, array) {
                    Ok((table, meta)) => {
                        current = table;
                        current_meta = meta;
                    }
                    Err(_) => return Err(self.table_conflict(header_start, next, &keys, array)),
                }
                ptr = next;
            } else {
                let (mut keys, value_start) = match self.parse_key(ptr, b'=') {
                    Ok(v) => v,
                    Err(e) => return Err(e),
                };
                let target = match meta::declare_key(&keys, current, current_meta) {
                    Ok(t) => t,
                    Err(conflict) => {
                        return Err(self.key_conflict(ptr, value_start, &keys, conflict));
                    }
                };
                let (value, next) =
                    match self.extract_value(value_start, None, self.options.max_depth) {
                        Ok(v) => v,
                        Err(e) => return Err(e),
                    };
                if let Some(name) = keys.pop() {
                    target.push_unchecked(name, value);
                }
                ptr = next;
            }

            ptr = match self.skip_void(ptr, true, false) {
                Ok(p) => p,
                Err(e) => return Err(e),
            };
            if ptr < self.bytes.len() && !is_newline_at(self.bytes, ptr) {
                return Err(self.error(ptr, ErrorKind::ExpectedNewline));
            }
            ptr = match self.skip_void(ptr, false, false) {
                Ok(p) => p,
                Err(e) => return Err(e),
            };
        }
        Ok(root)
    }
}

// ---------------------------------------------------------------------------
// Top-level parse entry points
// ---------------------------------------------------------------------------

/// Parses a TOML document with default [`ParseOptions`].
pub fn parse(text: &str) -> Result<Table, Error> {
    parse_with(text, &ParseOptions::default())
}

/// Parses a TOML document into its root [`Table`].
///
/// Parsing stops at the first violation; no partial table is returned.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Table, Error> {
    log_trace!(
        "parsing {} bytes (max_depth = {}, integers = {:?})",
        text.len(),
        options.max_depth,
        options.integers
    );
    let parser = Parser::new(text, options);
    match parser.parse_document() {
        Ok(root) => {
            log_trace!("parsed document with {} root keys", root.len());
            Ok(root)
        }
        Err(ParseError { kind, span }) => {
            let error = Error::new(text, span, kind);
            log_debug!(
                "parse failed: {} at {}:{}",
                error.kind,
                error.line,
                error.column
            );
            Err(error)
        }
    }
}

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;
