/// How integer literals are mapped onto [`Value`](crate::Value) variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BigIntPolicy {
    /// Integers outside the `i64` range are rejected.
    #[default]
    Never,
    /// Integers outside the `i64` range become [`Value::BigInteger`](crate::Value::BigInteger).
    AsNeeded,
    /// Every integer becomes [`Value::BigInteger`](crate::Value::BigInteger).
    Always,
}

/// Options accepted by [`parse_with`](crate::parse_with).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of arrays and inline tables. Values nested deeper than
    /// this abort the parse with
    /// [`ErrorKind::MaxDepthExceeded`](crate::ErrorKind::MaxDepthExceeded).
    pub max_depth: usize,
    pub integers: BigIntPolicy,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 1000;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_integers(mut self, integers: BigIntPolicy) -> Self {
        self.integers = integers;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            integers: BigIntPolicy::Never,
        }
    }
}
