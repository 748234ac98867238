//! Compare one field of a nested record against a text rule.
//!
//! A rule reads `field_path : operator : value`:
//!
//! ```
//! use fieldrule::{Document, Rule};
//!
//! let stats = Document::new()
//!     .set("link.latency", chrono::TimeDelta::milliseconds(12))
//!     .set("link.peer", "10.0.0.7".parse::<std::net::IpAddr>().unwrap());
//!
//! let mut slow = Rule::from_text("link.latency : > : 50ms").unwrap();
//! assert!(!slow.evaluate(&stats).unwrap());
//!
//! let mut internal = Rule::from_text("link.peer : within : 10.0.0.0/8 192.168.0.0/16").unwrap();
//! assert!(internal.evaluate(&stats).unwrap());
//! ```
//!
//! Records expose their fields through the [`Record`] trait. [`Document`] is a
//! ready-made dynamically shaped record. Every parsing step is a replaceable
//! strategy held in [`Parsers`].

mod evaluate;
mod parse;
mod prepare;
mod types;

pub use parse::{
    divide, divide_with, parse_duration_nanos, parse_f64, parse_i64, parse_list,
    parse_prefix_list, parse_range, parse_string_list, parse_timestamp_secs,
    parse_timestamp_with, parse_u64, split_path, split_path_with, Hook, LiteralError, Parsers,
    RuleParts, TIMESTAMP_FORMAT,
};
pub use prepare::PreparedKind;
pub use types::{
    classify, BoxError, Document, Domain, FieldKind, FieldPath, FieldValue, IpPrefix, Operand,
    Operator, Record, Rule, RuleError, Value, ValueShape,
};
