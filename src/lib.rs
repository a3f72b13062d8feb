//! A single-pass TOML parser producing an owned, order-preserving value tree.
//!
//! The parser walks the document once, threading a byte offset through a set
//! of small recursive-descent routines. Table legality (duplicate keys,
//! reopened tables, dotted keys reaching into closed tables, arrays of
//! tables) is tracked in a shadow tree built alongside the values, so the
//! returned [`Table`] carries no bookkeeping of its own.
//!
//! Parsing is all-or-nothing. The first violation aborts with an [`Error`]
//! that carries the byte [`Span`], the 1-based line and column, and a short
//! excerpt of the source with a caret under the fault.
//!
//! # Examples
//!
//! ```
//! use toml_cursor::{Error, Value};
//!
//! let content = r#"
//! title = "example"
//!
//! [[things]]
//! name = "hammer"
//! value = 43
//!
//! [[things]]
//! name = "drill"
//! value = 300
//! color = "green"
//! "#;
//!
//! let root = toml_cursor::parse(content)?;
//!
//! assert_eq!(root["title"].as_str(), Some("example"));
//! let things = root["things"].as_array().unwrap();
//! assert_eq!(things.len(), 2);
//! assert_eq!(things[1].get("color").and_then(Value::as_str), Some("green"));
//! # Ok::<(), Error>(())
//! ```
//!
//! Errors render with their location:
//!
//! ```
//! let err = toml_cursor::parse("a = 1\na = 2").unwrap_err();
//! assert_eq!(err.kind.to_string(), "duplicate-key");
//! assert_eq!((err.line, err.column), (2, 1));
//! println!("{}", err.report());
//! ```
//!
//! Integers beyond the `i64` range are rejected unless a [`BigIntPolicy`]
//! says otherwise:
//!
//! ```
//! use toml_cursor::{BigIntPolicy, ParseOptions};
//!
//! let options = ParseOptions::default().with_integers(BigIntPolicy::AsNeeded);
//! let root = toml_cursor::parse_with("n = 99999999999999999999", &options)?;
//! assert!(root["n"].as_big_integer().is_some());
//! # Ok::<(), toml_cursor::Error>(())
//! ```

mod array;
mod error;
mod key;
mod meta;
mod number;
mod options;
mod parser;
mod scan;
mod span;
mod string;
mod table;
mod time;
mod value;

pub use array::Array;
pub use error::{Error, ErrorCategory, ErrorKind};
pub use options::{BigIntPolicy, ParseOptions};
pub use parser::{parse, parse_with};
pub use span::Span;
pub use table::Table;
pub use time::{Date, Datetime, DatetimeKind, InvalidDatetime, Time, TimeOffset};
pub use value::Value;

#[cfg(feature = "serde")]
pub mod impl_serde;
