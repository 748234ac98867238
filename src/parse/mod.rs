mod duration;
mod error;
mod grammar;
mod number;
mod timestamp;

use std::fmt;
use std::sync::Arc;

use crate::types::{BoxError, IpPrefix};

pub use duration::parse_duration_nanos;
pub use error::LiteralError;
pub use grammar::{
    divide, divide_with, parse_list, parse_prefix_list, parse_range, parse_string_list,
    split_path, split_path_with, RuleParts,
};
pub use number::{parse_f64, parse_i64, parse_u64};
pub use timestamp::{parse_timestamp_secs, parse_timestamp_with, TIMESTAMP_FORMAT};

/// A replaceable parsing strategy: converts one piece of rule text into `T`.
pub type Hook<T> = Arc<dyn Fn(&str) -> Result<T, BoxError> + Send + Sync>;

/// The set of parsing strategies a [`Rule`](crate::Rule) uses.
///
/// Every slot starts with the default implementation and can be replaced on
/// its own:
///
/// ```
/// use fieldrule::{divide_with, Parsers, Rule};
///
/// let parsers = Parsers::new().divider(divide_with('|'));
/// let mut rule = Rule::with_parsers(parsers);
/// rule.parse("latency | < | 250").unwrap();
/// ```
#[derive(Clone)]
pub struct Parsers {
    pub(crate) divider: Hook<RuleParts>,
    pub(crate) path_splitter: Hook<Vec<String>>,
    pub(crate) range: Hook<(String, String)>,
    pub(crate) list: Hook<Vec<String>>,
    pub(crate) string_list: Hook<Vec<String>>,
    pub(crate) prefix_list: Hook<Vec<IpPrefix>>,
    pub(crate) integer: Hook<i64>,
    pub(crate) unsigned: Hook<u64>,
    pub(crate) float: Hook<f64>,
    pub(crate) duration: Hook<i64>,
    pub(crate) timestamp: Hook<i64>,
}

impl Default for Parsers {
    fn default() -> Self {
        Self {
            divider: Arc::new(divide),
            path_splitter: Arc::new(split_path),
            range: Arc::new(parse_range),
            list: Arc::new(parse_list),
            string_list: Arc::new(parse_string_list),
            prefix_list: Arc::new(parse_prefix_list),
            integer: Arc::new(parse_i64),
            unsigned: Arc::new(parse_u64),
            float: Arc::new(parse_f64),
            duration: Arc::new(parse_duration_nanos),
            timestamp: Arc::new(parse_timestamp_secs),
        }
    }
}

impl fmt::Debug for Parsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parsers").finish_non_exhaustive()
    }
}

impl Parsers {
    /// All default strategies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Split raw rule text into path, operator and value text.
    #[must_use]
    pub fn divider(
        mut self,
        f: impl Fn(&str) -> Result<RuleParts, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.divider = Arc::new(f);
        self
    }

    /// Split path text into field names.
    #[must_use]
    pub fn path_splitter(
        mut self,
        f: impl Fn(&str) -> Result<Vec<String>, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.path_splitter = Arc::new(f);
        self
    }

    /// Extract `(min, max)` for `in` / `notin`.
    #[must_use]
    pub fn range(
        mut self,
        f: impl Fn(&str) -> Result<(String, String), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.range = Arc::new(f);
        self
    }

    /// Extract the value list for `is` / `not`.
    #[must_use]
    pub fn list(
        mut self,
        f: impl Fn(&str) -> Result<Vec<String>, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.list = Arc::new(f);
        self
    }

    /// Extract the string list for `same`, `differ`, `contain` and `notcontain`.
    #[must_use]
    pub fn string_list(
        mut self,
        f: impl Fn(&str) -> Result<Vec<String>, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.string_list = Arc::new(f);
        self
    }

    /// Extract the network list for `within` / `notwithin`.
    #[must_use]
    pub fn prefix_list(
        mut self,
        f: impl Fn(&str) -> Result<Vec<IpPrefix>, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.prefix_list = Arc::new(f);
        self
    }

    /// Reduce a threshold literal for signed integer fields.
    #[must_use]
    pub fn integer(
        mut self,
        f: impl Fn(&str) -> Result<i64, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.integer = Arc::new(f);
        self
    }

    /// Reduce a threshold literal for unsigned integer fields.
    #[must_use]
    pub fn unsigned(
        mut self,
        f: impl Fn(&str) -> Result<u64, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.unsigned = Arc::new(f);
        self
    }

    /// Reduce a threshold literal for floating-point fields.
    #[must_use]
    pub fn float(
        mut self,
        f: impl Fn(&str) -> Result<f64, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.float = Arc::new(f);
        self
    }

    /// Reduce a duration literal to nanoseconds.
    #[must_use]
    pub fn duration(
        mut self,
        f: impl Fn(&str) -> Result<i64, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.duration = Arc::new(f);
        self
    }

    /// Reduce a timestamp literal to unix seconds.
    #[must_use]
    pub fn timestamp(
        mut self,
        f: impl Fn(&str) -> Result<i64, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.timestamp = Arc::new(f);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_installed() {
        let parsers = Parsers::new();
        assert_eq!((parsers.integer)("0x10").unwrap(), 16);
        assert_eq!((parsers.duration)("1s").unwrap(), 1_000_000_000);
        assert_eq!(
            (parsers.divider)("a:b:c").unwrap(),
            RuleParts {
                path: "a".into(),
                operator: "b".into(),
                value: "c".into(),
            }
        );
    }

    #[test]
    fn replacing_one_hook_keeps_the_rest() {
        let parsers = Parsers::new().integer(|s| Ok(s.len() as i64));
        assert_eq!((parsers.integer)("abc").unwrap(), 3);
        assert_eq!((parsers.unsigned)("7").unwrap(), 7);
        assert_eq!((parsers.range)("1 2").unwrap(), ("1".into(), "2".into()));
    }

    #[test]
    fn debug_does_not_expose_closures() {
        assert_eq!(format!("{:?}", Parsers::new()), "Parsers { .. }");
    }
}
