use thiserror::Error;

use super::field::FieldKind;
use super::operator::Operator;

/// Boxed error returned by parsing strategies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while parsing or evaluating a rule.
///
/// Evaluation never reports partial success: when an error comes back the
/// rule did not evaluate.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("malformed rule '{rule}': {source}")]
    MalformedRule {
        rule: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid operator '{operator}'")]
    InvalidOperator { operator: String },

    #[error("cannot parse value '{value}' for operator '{operator}': {source}")]
    ValueParseFailure {
        operator: Operator,
        value: String,
        #[source]
        source: BoxError,
    },

    #[error("cannot reduce '{literal}' for {kind} field: {source}")]
    ThresholdReduceFailure {
        literal: String,
        kind: FieldKind,
        #[source]
        source: BoxError,
    },

    #[error("inverted range '{min} {max}': max is smaller than min")]
    InvertedRange { min: String, max: String },

    #[error("no field '{field}' in '{path}'")]
    NoSuchField { path: String, field: String },

    #[error("'{path}' is not a composite value")]
    NotComposite { path: String },

    #[error("'{path}' is an empty optional reference")]
    NilReference { path: String },

    #[error("field '{path}' has unsupported kind {kind}")]
    UnsupportedFieldKind { path: String, kind: FieldKind },

    #[error("operator '{operator}' does not apply to {kind} field")]
    OperatorKindMismatch { operator: Operator, kind: FieldKind },

    #[error("field '{path}' holds a {kind} outside the comparable range")]
    FieldOutOfRange { path: String, kind: FieldKind },

    #[error("rule has not been parsed")]
    NotParsed,
}
