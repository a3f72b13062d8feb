use crate::Span;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Error produced when a document cannot be parsed.
///
/// Parsing is all-or-nothing: the first violation aborts the parse and no
/// partial tree is returned.
#[derive(Debug, Clone)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// The byte span where the error occurs.
    pub span: Span,
    /// 1-based line of the fault.
    pub line: usize,
    /// 1-based column of the fault, counted in characters.
    pub column: usize,
    /// Three line excerpt of the source with a caret under the column.
    pub code_snippet: String,
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn new(source: &str, span: Span, kind: ErrorKind) -> Self {
        let (line, column) = line_col(source, span.start as usize);
        let code_snippet = code_block(source, line, column);
        Self {
            kind,
            span,
            line,
            column,
            code_snippet,
        }
    }

    /// The broad category of this error.
    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Renders the message together with the annotated source excerpt, ready
    /// for terminal or log output.
    pub fn report(&self) -> String {
        format!("invalid TOML document: {self}\n\n{}", self.code_snippet)
    }
}

/// Broad classes of parse failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Control characters in comments or strings.
    Lexical,
    /// Missing closing quote, bracket, or brace.
    UnterminatedStructure,
    /// Bad number, date, or escape syntax.
    MalformedLiteral,
    /// Illegal characters or newlines in a key.
    Key,
    /// Duplicate keys and illegal table redefinitions.
    StructuralConflict,
    /// Nesting past the configured limit.
    DepthExceeded,
    /// Anything else that breaks the grammar.
    Syntax,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexical => "lexical",
            Self::UnterminatedStructure => "unterminated-structure",
            Self::MalformedLiteral => "malformed-literal",
            Self::Key => "key",
            Self::StructuralConflict => "structural-conflict",
            Self::DepthExceeded => "depth-exceeded",
            Self::Syntax => "syntax",
        })
    }
}

/// Specific reasons a document was rejected.
#[derive(Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A comment contains a control character other than tab.
    ControlCharInComment,
    /// A string contains a control character other than tab.
    IllegalControlCharacter,
    /// EOF was reached before the closing quote of a string.
    UnterminatedString,
    /// A single-line string contains a raw newline.
    UnterminatedLine,
    /// No separator or terminator was found before EOF.
    UnterminatedStructure,
    /// EOF was reached before the closing `]` of an array.
    UnterminatedArray,
    /// EOF was reached before the closing `}` of an inline table.
    UnterminatedInlineTable,
    /// A backslash followed by whitespace that does not end the line.
    InvalidEscape,
    /// An escape character that TOML does not define.
    UnknownEscape(char),
    /// A `\u`/`\U` escape with bad hex digits or an illegal code point.
    InvalidUnicodeEscape,
    /// A decimal number with a leading zero.
    LeadingZero,
    /// A number that matches the grammar but cannot be converted.
    InvalidNumber,
    /// An integer outside the `i64` range while big integers are disabled.
    LossyInteger,
    /// Text that is no boolean, number, or date/time.
    InvalidValue,
    /// A key-value declaration without a value.
    MissingValue,
    /// A bare key contains characters outside `A-Za-z0-9_-`.
    IllegalKeyChar,
    /// A key uses a multiline string.
    MultilineKeyForbidden,
    /// A quoted key is followed by a newline before its terminator.
    NewlineInKey,
    /// A quoted key segment is followed by stray characters.
    ExtraTokensAfterKey,
    /// The `=` or `]` ending a key could not be found.
    IncompleteKey,
    /// A key was assigned twice.
    DuplicateKey {
        /// The dotted path of the duplicate key
        key: String,
    },
    /// A table header redefines an already defined table or value.
    DuplicateTable {
        /// The dotted path of the table
        name: String,
    },
    /// An array-of-tables header names something that is not an array of tables.
    RedefineAsArray {
        /// The dotted path of the table
        name: String,
    },
    /// A dotted key tried to extend a table that was closed by a header.
    DottedKeyIntoTable {
        /// The dotted path of the key
        key: String,
    },
    /// Arrays or inline tables nested past the configured depth.
    MaxDepthExceeded,
    /// A declaration is followed by something other than end-of-line.
    ExpectedNewline,
    /// An array-of-tables header is missing its second `]`.
    ExpectedTableEnd,
    /// A comma with no value before it.
    UnexpectedComma,
    /// A comma right before the `}` of an inline table.
    TrailingComma,
    /// A raw newline inside an inline table.
    NewlineInInlineTable,
    /// A comment inside an inline table.
    CommentInInlineTable,
    /// An unexpected character after a value.
    UnexpectedCharacter(char),
}

impl ErrorKind {
    /// Maps the kind onto its broad [`ErrorCategory`].
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ControlCharInComment | Self::IllegalControlCharacter => ErrorCategory::Lexical,
            Self::UnterminatedString
            | Self::UnterminatedLine
            | Self::UnterminatedStructure
            | Self::UnterminatedArray
            | Self::UnterminatedInlineTable => ErrorCategory::UnterminatedStructure,
            Self::InvalidEscape
            | Self::UnknownEscape(..)
            | Self::InvalidUnicodeEscape
            | Self::LeadingZero
            | Self::InvalidNumber
            | Self::LossyInteger
            | Self::InvalidValue
            | Self::MissingValue => ErrorCategory::MalformedLiteral,
            Self::IllegalKeyChar
            | Self::MultilineKeyForbidden
            | Self::NewlineInKey
            | Self::ExtraTokensAfterKey => ErrorCategory::Key,
            Self::DuplicateKey { .. }
            | Self::DuplicateTable { .. }
            | Self::RedefineAsArray { .. }
            | Self::DottedKeyIntoTable { .. } => ErrorCategory::StructuralConflict,
            Self::MaxDepthExceeded => ErrorCategory::DepthExceeded,
            Self::IncompleteKey
            | Self::ExpectedNewline
            | Self::ExpectedTableEnd
            | Self::UnexpectedComma
            | Self::TrailingComma
            | Self::NewlineInInlineTable
            | Self::CommentInInlineTable
            | Self::UnexpectedCharacter(..) => ErrorCategory::Syntax,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ControlCharInComment => "control-char-in-comment",
            Self::IllegalControlCharacter => "illegal-control-character",
            Self::UnterminatedString => "unterminated-string",
            Self::UnterminatedLine => "unterminated-line",
            Self::UnterminatedStructure => "unterminated-structure",
            Self::UnterminatedArray => "unterminated-array",
            Self::UnterminatedInlineTable => "unterminated-inline-table",
            Self::InvalidEscape => "invalid-escape",
            Self::UnknownEscape(..) => "unknown-escape",
            Self::InvalidUnicodeEscape => "invalid-unicode-escape",
            Self::LeadingZero => "leading-zero",
            Self::InvalidNumber => "invalid-number",
            Self::LossyInteger => "lossy-integer",
            Self::InvalidValue => "invalid-value",
            Self::MissingValue => "missing-value",
            Self::IllegalKeyChar => "illegal-key-char",
            Self::MultilineKeyForbidden => "multiline-key-forbidden",
            Self::NewlineInKey => "newline-in-key",
            Self::ExtraTokensAfterKey => "extra-tokens-after-key",
            Self::IncompleteKey => "incomplete-key",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::RedefineAsArray { .. } => "redefine-as-array",
            Self::DottedKeyIntoTable { .. } => "dotted-key-into-table",
            Self::MaxDepthExceeded => "max-depth-exceeded",
            Self::ExpectedNewline => "expected-newline",
            Self::ExpectedTableEnd => "expected-table-end",
            Self::UnexpectedComma => "unexpected-comma",
            Self::TrailingComma => "trailing-comma",
            Self::NewlineInInlineTable => "newline-in-inline-table",
            Self::CommentInInlineTable => "comment-in-inline-table",
            Self::UnexpectedCharacter(..) => "unexpected-character",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::ControlCharInComment => {
                f.write_str("control characters are not allowed in comments")
            }
            ErrorKind::IllegalControlCharacter => {
                f.write_str("control characters are not allowed in strings")
            }
            ErrorKind::UnterminatedString => f.write_str("unfinished string encountered"),
            ErrorKind::UnterminatedLine => f.write_str("newlines are not allowed in strings"),
            ErrorKind::UnterminatedStructure => f.write_str("cannot find end of structure"),
            ErrorKind::UnterminatedArray => f.write_str("unfinished array encountered"),
            ErrorKind::UnterminatedInlineTable => f.write_str("unfinished table encountered"),
            ErrorKind::InvalidEscape => {
                f.write_str("invalid escape: only line-ending whitespace may be escaped")
            }
            ErrorKind::UnknownEscape(c) => {
                write!(f, "unrecognized escape sequence: `\\{}`", Escape(*c))
            }
            ErrorKind::InvalidUnicodeEscape => f.write_str("invalid unicode escape"),
            ErrorKind::LeadingZero => f.write_str("leading zeroes are not allowed"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::LossyInteger => {
                f.write_str("integer value cannot be represented losslessly")
            }
            ErrorKind::InvalidValue => f.write_str("invalid value"),
            ErrorKind::MissingValue => {
                f.write_str("incomplete key-value declaration: no value specified")
            }
            ErrorKind::IllegalKeyChar => {
                f.write_str("only letters, numbers, dashes and underscores are allowed in keys")
            }
            ErrorKind::MultilineKeyForbidden => {
                f.write_str("multiline strings are not allowed in keys")
            }
            ErrorKind::NewlineInKey => f.write_str("newlines are not allowed in keys"),
            ErrorKind::ExtraTokensAfterKey => {
                f.write_str("found extra tokens after the string part of a key")
            }
            ErrorKind::IncompleteKey => {
                f.write_str("incomplete key-value: cannot find end of key")
            }
            ErrorKind::DuplicateKey { key } => write!(f, "duplicate key: `{key}`"),
            ErrorKind::DuplicateTable { name } => write!(f, "redefinition of table `{name}`"),
            ErrorKind::RedefineAsArray { name } => {
                write!(f, "`{name}` is already defined and is not an array of tables")
            }
            ErrorKind::DottedKeyIntoTable { key } => {
                write!(f, "dotted key `{key}` attempted to extend a closed table")
            }
            ErrorKind::MaxDepthExceeded => {
                f.write_str("document contains excessively nested structures")
            }
            ErrorKind::ExpectedNewline => {
                f.write_str("each declaration must be followed by an end-of-line")
            }
            ErrorKind::ExpectedTableEnd => f.write_str("expected end of table declaration"),
            ErrorKind::UnexpectedComma => f.write_str("expected value, found comma"),
            ErrorKind::TrailingComma => {
                f.write_str("trailing commas are not allowed in inline tables")
            }
            ErrorKind::NewlineInInlineTable => {
                f.write_str("newlines are not allowed in inline tables")
            }
            ErrorKind::CommentInInlineTable => f.write_str("inline tables cannot contain comments"),
            ErrorKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character found: `{}`", Escape(*c))
            }
        }
    }
}

/// Returns the 1-based line and character column of `offset`.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let bytes = source.as_bytes();
    let mut line = 1;
    let mut line_start = 0;
    let mut i = 0;
    while i < offset {
        match bytes[i] {
            b'\n' => {
                line += 1;
                line_start = i + 1;
            }
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => {
                line += 1;
                line_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    let column = source[line_start..offset].chars().count() + 1;
    (line, column)
}

fn split_lines(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&source[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&source[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    lines.push(&source[start..]);
    lines
}

/// Renders the lines around `line` with a caret under `column`.
pub(crate) fn code_block(source: &str, line: usize, column: usize) -> String {
    use std::fmt::Write as _;

    let lines = split_lines(source);
    let number_len = (line + 1).to_string().len();
    let mut block = String::new();
    for i in line.saturating_sub(1).max(1)..=line + 1 {
        let Some(text) = lines.get(i - 1) else {
            continue;
        };
        if text.is_empty() && i != line {
            continue;
        }
        let _ = writeln!(block, "{i:<number_len$}:  {text}");
        if i == line {
            let _ = writeln!(block, "{}^", " ".repeat(number_len + column + 2));
        }
    }
    block
}
