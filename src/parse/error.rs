use std::fmt;

/// Error produced by the default parsing strategies and literal types.
///
/// Inside a rule the engine wraps it into the matching [`RuleError`](crate::RuleError)
/// variant and keeps it as the error `source()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    message: String,
}

impl LiteralError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LiteralError {}
