//! Prepared-threshold cache.
//!
//! Numeric thresholds are reduced from rule text once per field kind and kept
//! on the rule until a field of another kind, a reparse, or an explicit reset
//! replaces them.

use std::fmt;

use tracing::debug;

use crate::parse::{Hook, Parsers};
use crate::types::{FieldKind, Operand, Operator, RuleError};

/// Which reduction currently backs a rule's cached threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PreparedKind {
    /// Nothing cached: the next numeric comparison reduces the threshold text.
    #[default]
    NotPrepared,
    AsInteger,
    AsUnsigned,
    AsFloat,
    AsDuration,
    AsTimestamp,
}

impl fmt::Display for PreparedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PreparedKind::NotPrepared => "not prepared",
            PreparedKind::AsInteger => "integer",
            PreparedKind::AsUnsigned => "unsigned",
            PreparedKind::AsFloat => "float",
            PreparedKind::AsDuration => "duration",
            PreparedKind::AsTimestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Reduced threshold(s), mirroring the operand shape.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Threshold<T> {
    Single(T),
    Range(T, T),
    List(Vec<T>),
}

impl<T: PartialOrd + Copy> Threshold<T> {
    fn reduce(
        operator: Operator,
        operand: &Operand,
        hook: &Hook<T>,
        kind: FieldKind,
    ) -> Result<Self, RuleError> {
        let one = |literal: &str| {
            hook(literal).map_err(|source| RuleError::ThresholdReduceFailure {
                literal: literal.to_owned(),
                kind,
                source,
            })
        };
        match operand {
            Operand::Single(text) => Ok(Threshold::Single(one(text.as_str())?)),
            Operand::Range { min, max } => {
                let (lo, hi) = (one(min.as_str())?, one(max.as_str())?);
                if hi < lo {
                    return Err(RuleError::InvertedRange {
                        min: min.clone(),
                        max: max.clone(),
                    });
                }
                Ok(Threshold::Range(lo, hi))
            }
            Operand::List(items) => items
                .iter()
                .map(|item| one(item.as_str()))
                .collect::<Result<Vec<_>, _>>()
                .map(Threshold::List),
            Operand::Strings(_) | Operand::Prefixes(_) => {
                Err(RuleError::OperatorKindMismatch { operator, kind })
            }
        }
    }

    /// Apply `operator` with the field value `v` on the left.
    pub(crate) fn test(&self, operator: Operator, v: T) -> bool {
        match self {
            Threshold::Single(t) => match operator {
                Operator::Eq => v == *t,
                Operator::Neq => v != *t,
                Operator::Gt => v > *t,
                Operator::Gte => v >= *t,
                Operator::Lt => v < *t,
                Operator::Lte => v <= *t,
                _ => false,
            },
            Threshold::Range(min, max) => (*min <= v && v <= *max) != operator.is_negated(),
            Threshold::List(items) => items.contains(&v) != operator.is_negated(),
        }
    }
}

/// The cache slot owned by a rule.
#[derive(Debug, Clone, Default)]
pub(crate) enum Prepared {
    #[default]
    NotPrepared,
    Integer(Threshold<i64>),
    Unsigned(Threshold<u64>),
    Float(Threshold<f64>),
    Duration(Threshold<i64>),
    Timestamp(Threshold<i64>),
}

impl Prepared {
    pub(crate) fn kind(&self) -> PreparedKind {
        match self {
            Prepared::NotPrepared => PreparedKind::NotPrepared,
            Prepared::Integer(_) => PreparedKind::AsInteger,
            Prepared::Unsigned(_) => PreparedKind::AsUnsigned,
            Prepared::Float(_) => PreparedKind::AsFloat,
            Prepared::Duration(_) => PreparedKind::AsDuration,
            Prepared::Timestamp(_) => PreparedKind::AsTimestamp,
        }
    }

    /// Test `value`, reducing the threshold first when the cache holds another kind.
    pub(crate) fn test_and_fill<R: Reduction>(
        &mut self,
        parsers: &Parsers,
        operator: Operator,
        operand: &Operand,
        value: R::Output,
    ) -> Result<bool, RuleError> {
        if let Some(threshold) = R::cached(self) {
            return Ok(threshold.test(operator, value));
        }
        let threshold = Threshold::reduce(operator, operand, R::hook(parsers), R::FIELD)?;
        let result = threshold.test(operator, value);
        debug!(from = %self.kind(), to = %R::KIND, "prepared threshold");
        *self = R::wrap(threshold);
        Ok(result)
    }

    /// Like [`Prepared::test_and_fill`], but a miss reduces into a temporary.
    pub(crate) fn test_readonly<R: Reduction>(
        &self,
        parsers: &Parsers,
        operator: Operator,
        operand: &Operand,
        value: R::Output,
    ) -> Result<bool, RuleError> {
        match R::cached(self) {
            Some(threshold) => Ok(threshold.test(operator, value)),
            None => Ok(
                Threshold::reduce(operator, operand, R::hook(parsers), R::FIELD)?
                    .test(operator, value),
            ),
        }
    }
}

/// One numeric reduction: which hook produces it and which cache slot holds it.
pub(crate) trait Reduction {
    type Output: PartialOrd + Copy;
    const KIND: PreparedKind;
    const FIELD: FieldKind;

    fn hook(parsers: &Parsers) -> &Hook<Self::Output>;
    fn cached(prepared: &Prepared) -> Option<&Threshold<Self::Output>>;
    fn wrap(threshold: Threshold<Self::Output>) -> Prepared;
}

macro_rules! reduction {
    ($name:ident, $output:ty, $variant:ident, $kind:ident, $field:ident, $hook:ident) => {
        pub(crate) struct $name;

        impl Reduction for $name {
            type Output = $output;
            const KIND: PreparedKind = PreparedKind::$kind;
            const FIELD: FieldKind = FieldKind::$field;

            fn hook(parsers: &Parsers) -> &Hook<$output> {
                &parsers.$hook
            }

            fn cached(prepared: &Prepared) -> Option<&Threshold<$output>> {
                match prepared {
                    Prepared::$variant(threshold) => Some(threshold),
                    _ => None,
                }
            }

            fn wrap(threshold: Threshold<$output>) -> Prepared {
                Prepared::$variant(threshold)
            }
        }
    };
}

reduction!(IntegerReduction, i64, Integer, AsInteger, Integer, integer);
reduction!(UnsignedReduction, u64, Unsigned, AsUnsigned, Unsigned, unsigned);
reduction!(FloatReduction, f64, Float, AsFloat, Float, float);
reduction!(DurationReduction, i64, Duration, AsDuration, Duration, duration);
reduction!(TimestampReduction, i64, Timestamp, AsTimestamp, Timestamp, timestamp);
