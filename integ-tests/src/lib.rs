#![allow(missing_docs)]

use toml_cursor::ErrorCategory;

/// Reads a fixture from the `data/` directory.
pub fn load(path: &str) -> String {
    let full = format!("{}/data/{path}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&full).unwrap_or_else(|e| panic!("failed to load {full}: {e}"))
}

/// Parses `data/valid/<name>.toml` and compares its JSON rendering against
/// `data/valid/<name>.json`.
pub fn check_valid(name: &str) {
    let toml_str = load(&format!("valid/{name}.toml"));
    let expected = load(&format!("valid/{name}.json"));

    let table = toml_cursor::parse(&toml_str)
        .unwrap_or_else(|e| panic!("failed to parse {name}.toml\n{}", e.report()));
    let actual = serde_json::to_value(&table).expect("failed to render as json");
    let expected: serde_json::Value =
        serde_json::from_str(&expected).expect("expected json is malformed");

    pretty_assertions::assert_eq!(actual, expected);
}

/// Parses `data/invalid/<name>.toml` and asserts it fails with `code` at
/// `line`:`column`.
pub fn check_invalid(name: &str, code: &str, category: ErrorCategory, line: usize, column: usize) {
    let toml_str = load(&format!("invalid/{name}.toml"));
    let err = match toml_cursor::parse(&toml_str) {
        Ok(table) => panic!("expected {name}.toml to fail, parsed {table:?}"),
        Err(err) => err,
    };

    pretty_assertions::assert_eq!(
        (err.kind.to_string().as_str(), err.category(), err.line, err.column),
        (code, category, line, column),
        "\n{}",
        err.report()
    );
    assert!(
        err.code_snippet.contains(&format!("{line}")),
        "snippet does not show line {line}:\n{}",
        err.code_snippet
    );
}

/// Declares a test comparing a valid fixture against its expected JSON.
#[macro_export]
macro_rules! valid {
    ($name:ident) => {
        #[test]
        fn $name() {
            $crate::check_valid(stringify!($name));
        }
    };
}

/// Declares a test asserting an invalid fixture fails where expected.
#[macro_export]
macro_rules! invalid {
    ($name:ident, $code:literal, $category:ident, $line:literal : $column:literal) => {
        #[test]
        fn $name() {
            $crate::check_invalid(
                stringify!($name),
                $code,
                toml_cursor::ErrorCategory::$category,
                $line,
                $column,
            );
        }
    };
}
