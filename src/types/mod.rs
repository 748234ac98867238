mod document;
mod error;
mod field;
mod network;
mod operator;
mod path;
mod rule;
mod value;

pub use document::Document;
pub use error::{BoxError, RuleError};
pub use field::{FieldKind, FieldValue, Record};
pub use network::IpPrefix;
pub use operator::{classify, Domain, Operator, ValueShape};
pub use path::FieldPath;
pub use rule::{Operand, Rule};
pub use value::Value;

pub(crate) use rule::ParsedRule;
