use std::fmt;
use std::str::FromStr;

use super::error::RuleError;

/// Comparison operators accepted in the operator part of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Is,
    Not,
    Same,
    Differ,
    Contain,
    NotContain,
    Within,
    NotWithin,
}

/// The shape of the value text an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// One literal.
    Single,
    /// A `min max` pair.
    Range,
    /// One or more literals.
    List,
}

/// The family of field kinds an operator can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Integers, floats, durations and timestamps.
    Numeric,
    /// Strings.
    Text,
    /// IP addresses.
    Network,
}

impl Operator {
    pub const ALL: [Operator; 16] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
        Operator::Is,
        Operator::Not,
        Operator::Same,
        Operator::Differ,
        Operator::Contain,
        Operator::NotContain,
        Operator::Within,
        Operator::NotWithin,
    ];

    /// The rule-text token for this operator.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Neq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "in",
            Operator::NotIn => "notin",
            Operator::Is => "is",
            Operator::Not => "not",
            Operator::Same => "same",
            Operator::Differ => "differ",
            Operator::Contain => "contain",
            Operator::NotContain => "notcontain",
            Operator::Within => "within",
            Operator::NotWithin => "notwithin",
        }
    }

    #[must_use]
    pub fn shape(self) -> ValueShape {
        match self {
            Operator::Eq
            | Operator::Neq
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte => ValueShape::Single,
            Operator::In | Operator::NotIn => ValueShape::Range,
            Operator::Is
            | Operator::Not
            | Operator::Same
            | Operator::Differ
            | Operator::Contain
            | Operator::NotContain
            | Operator::Within
            | Operator::NotWithin => ValueShape::List,
        }
    }

    #[must_use]
    pub fn domain(self) -> Domain {
        match self {
            Operator::Same | Operator::Differ | Operator::Contain | Operator::NotContain => {
                Domain::Text
            }
            Operator::Within | Operator::NotWithin => Domain::Network,
            _ => Domain::Numeric,
        }
    }

    /// Whether the operator negates the membership test it is built on
    /// (`notin`, `not`, `differ`, `notcontain`, `notwithin`).
    #[must_use]
    pub fn is_negated(self) -> bool {
        matches!(
            self,
            Operator::NotIn
                | Operator::Not
                | Operator::Differ
                | Operator::NotContain
                | Operator::NotWithin
        )
    }
}

/// Classify an operator token by the value shape it expects.
/// Returns `None` for tokens outside the operator set.
#[must_use]
pub fn classify(token: &str) -> Option<ValueShape> {
    token.parse::<Operator>().ok().map(Operator::shape)
}

impl FromStr for Operator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.token() == s)
            .ok_or_else(|| RuleError::InvalidOperator {
                operator: s.to_owned(),
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Single => write!(f, "single"),
            ValueShape::Range => write!(f, "range"),
            ValueShape::List => write!(f, "list"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = <String as serde::Deserialize>::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}
