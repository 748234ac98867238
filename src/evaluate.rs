use std::net::IpAddr;

use crate::parse::Parsers;
use crate::prepare::{
    DurationReduction, FloatReduction, IntegerReduction, Prepared, Reduction, TimestampReduction,
    UnsignedReduction,
};
use crate::types::{FieldKind, FieldValue, Operand, Operator, ParsedRule, RuleError};

/// How the comparator may use the rule's prepared-threshold cache.
pub(crate) enum Cache<'a> {
    /// Reduce on a miss and store the result.
    Fill(&'a mut Prepared),
    /// Use a matching entry, otherwise reduce into a temporary.
    ReadOnly(&'a Prepared),
}

impl Cache<'_> {
    fn test<R: Reduction>(
        &mut self,
        parsers: &Parsers,
        rule: &ParsedRule,
        value: R::Output,
    ) -> Result<bool, RuleError> {
        match self {
            Cache::Fill(prepared) => {
                prepared.test_and_fill::<R>(parsers, rule.operator, &rule.operand, value)
            }
            Cache::ReadOnly(prepared) => {
                prepared.test_readonly::<R>(parsers, rule.operator, &rule.operand, value)
            }
        }
    }
}

/// Compare a resolved field value against a parsed rule.
pub(crate) fn compare(
    rule: &ParsedRule,
    parsers: &Parsers,
    mut cache: Cache<'_>,
    value: &FieldValue<'_>,
) -> Result<bool, RuleError> {
    let kind = value.kind();
    let domain = kind.domain().ok_or_else(|| RuleError::UnsupportedFieldKind {
        path: rule.path.to_string(),
        kind,
    })?;
    if rule.operator.domain() != domain {
        return Err(RuleError::OperatorKindMismatch {
            operator: rule.operator,
            kind,
        });
    }

    match value {
        FieldValue::Int(v) => cache.test::<IntegerReduction>(parsers, rule, *v),
        FieldValue::Uint(v) => cache.test::<UnsignedReduction>(parsers, rule, *v),
        FieldValue::Float(v) => cache.test::<FloatReduction>(parsers, rule, *v),
        FieldValue::Duration(d) => {
            let nanos = d.num_nanoseconds().ok_or_else(|| RuleError::FieldOutOfRange {
                path: rule.path.to_string(),
                kind,
            })?;
            cache.test::<DurationReduction>(parsers, rule, nanos)
        }
        FieldValue::Timestamp(t) => cache.test::<TimestampReduction>(parsers, rule, t.timestamp()),
        FieldValue::Str(s) => match_text(rule, s),
        FieldValue::Ip(addr) => match_network(rule, *addr),
        FieldValue::Bool(_) | FieldValue::Record(_) | FieldValue::Optional(_) => {
            Err(RuleError::UnsupportedFieldKind {
                path: rule.path.to_string(),
                kind,
            })
        }
    }
}

fn match_text(rule: &ParsedRule, text: &str) -> Result<bool, RuleError> {
    let Operand::Strings(items) = &rule.operand else {
        return Err(mismatch(rule, FieldKind::String));
    };
    let hit = match rule.operator {
        Operator::Contain | Operator::NotContain => {
            items.iter().any(|item| text.contains(item.as_str()))
        }
        _ => items.iter().any(|item| item == text),
    };
    Ok(hit != rule.operator.is_negated())
}

fn match_network(rule: &ParsedRule, addr: IpAddr) -> Result<bool, RuleError> {
    let Operand::Prefixes(prefixes) = &rule.operand else {
        return Err(mismatch(rule, FieldKind::Ip));
    };
    let hit = prefixes.iter().any(|prefix| prefix.contains(addr));
    Ok(hit != rule.operator.is_negated())
}

fn mismatch(rule: &ParsedRule, kind: FieldKind) -> RuleError {
    RuleError::OperatorKindMismatch {
        operator: rule.operator,
        kind,
    }
}
