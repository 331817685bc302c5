/// Errors reported by the library.
///
/// Non-finite states are not errors: divergent runs pass inf/NaN through the
/// trajectory and callers decide what to do with them.
#[derive(Debug, Clone, PartialEq)]
pub enum LorenzError {
    /// An argument outside its accepted set, rejected before any mutation.
    InvalidArgument {
        /// Which argument was rejected (e.g. "method")
        argument: &'static str,
        /// The offending value
        value: String,
        /// Human-readable list of accepted values
        expected: &'static str,
    },
}

impl LorenzError {
    pub fn invalid(argument: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        LorenzError::InvalidArgument {
            argument,
            value: value.into(),
            expected,
        }
    }
}

impl std::fmt::Display for LorenzError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LorenzError::InvalidArgument { argument, value, expected } => {
                write!(f, "Invalid {} {:?}: expected {}", argument, value, expected)
            }
        }
    }
}

impl std::error::Error for LorenzError {}
