use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::evaluate::{compare, Cache};
use crate::parse::{LiteralError, Parsers};
use crate::prepare::{Prepared, PreparedKind};

use super::error::{BoxError, RuleError};
use super::field::{FieldKind, Record};
use super::network::IpPrefix;
use super::operator::{Domain, Operator, ValueShape};
use super::path::FieldPath;

/// The parsed value part of a rule, shaped by its operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// One literal, for `==`, `!=`, `>`, `>=`, `<`, `<=`.
    Single(String),
    /// A `min max` pair, for `in` and `notin`.
    Range { min: String, max: String },
    /// Numeric-like literals, for `is` and `not`.
    List(Vec<String>),
    /// Unescaped quoted strings, for `same`, `differ`, `contain`, `notcontain`.
    Strings(Vec<String>),
    /// Network prefixes, for `within` and `notwithin`.
    Prefixes(Vec<IpPrefix>),
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedRule {
    pub(crate) text: String,
    pub(crate) path: FieldPath,
    pub(crate) operator: Operator,
    pub(crate) raw_value: String,
    pub(crate) operand: Operand,
}

/// A text rule comparing one field of a record against a threshold.
///
/// A rule is created empty, parsed from text, then evaluated any number of
/// times. Numeric thresholds are reduced on first use and cached on the rule,
/// which is why [`Rule::evaluate`] takes `&mut self`. Use [`Rule::check`] for
/// evaluation through a shared reference.
///
/// ```
/// use fieldrule::{Document, Rule};
///
/// let mut rule: Rule = "port.rx_errors : <= : 10".parse().unwrap();
/// let stats = Document::new().set("port.rx_errors", 3_i64);
/// assert!(rule.evaluate(&stats).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rule {
    parsers: Parsers,
    parsed: Option<ParsedRule>,
    prepared: Prepared,
}

impl Rule {
    /// An empty rule using the default [`Parsers`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty rule using the given parsing strategies.
    #[must_use]
    pub fn with_parsers(parsers: Parsers) -> Self {
        Self {
            parsers,
            parsed: None,
            prepared: Prepared::NotPrepared,
        }
    }

    /// Parse `text` with the default [`Parsers`].
    ///
    /// # Errors
    ///
    /// See [`Rule::parse`].
    pub fn from_text(text: &str) -> Result<Self, RuleError> {
        let mut rule = Self::new();
        rule.parse(text)?;
        Ok(rule)
    }

    /// Parse `text`, replacing whatever this rule held before.
    ///
    /// The prepared-threshold cache is always reset. On failure the rule is
    /// left unparsed and evaluating it returns [`RuleError::NotParsed`].
    ///
    /// # Errors
    ///
    /// - [`RuleError::MalformedRule`] if the divider or path splitter rejects the text.
    /// - [`RuleError::InvalidOperator`] if the operator token is unknown.
    /// - [`RuleError::ValueParseFailure`] if the value does not have the operator's shape.
    /// - [`RuleError::ThresholdReduceFailure`] if a network prefix does not parse.
    pub fn parse(&mut self, text: &str) -> Result<(), RuleError> {
        self.parsed = None;
        self.prepared = Prepared::NotPrepared;
        match self.build(text) {
            Ok(parsed) => {
                debug!(
                    rule = %parsed.text,
                    operator = %parsed.operator,
                    shape = %parsed.operator.shape(),
                    "parsed rule"
                );
                self.parsed = Some(parsed);
                Ok(())
            }
            Err(err) => {
                trace!(rule = text, error = %err, "rule parse failed");
                Err(err)
            }
        }
    }

    fn build(&self, text: &str) -> Result<ParsedRule, RuleError> {
        let malformed = |source: BoxError| RuleError::MalformedRule {
            rule: text.to_owned(),
            source,
        };
        let parts = (self.parsers.divider)(text).map_err(malformed)?;
        let components = (self.parsers.path_splitter)(&parts.path).map_err(malformed)?;
        let path = FieldPath::new(components).map_err(|err| malformed(err.into()))?;
        let operator: Operator = parts.operator.parse()?;
        let operand = self.parse_operand(operator, &parts.value)?;
        Ok(ParsedRule {
            text: text.to_owned(),
            path,
            operator,
            raw_value: parts.value,
            operand,
        })
    }

    fn parse_operand(&self, operator: Operator, value: &str) -> Result<Operand, RuleError> {
        let failure = |source: BoxError| RuleError::ValueParseFailure {
            operator,
            value: value.to_owned(),
            source,
        };
        let non_empty = |items: Vec<String>| {
            if items.is_empty() {
                Err(failure(LiteralError::new("list is empty").into()))
            } else {
                Ok(items)
            }
        };

        match (operator.shape(), operator.domain()) {
            (ValueShape::Single, _) => {
                if value.is_empty() {
                    return Err(failure(LiteralError::new("value is empty").into()));
                }
                Ok(Operand::Single(value.to_owned()))
            }
            (ValueShape::Range, _) => {
                let (min, max) = (self.parsers.range)(value).map_err(failure)?;
                Ok(Operand::Range { min, max })
            }
            (ValueShape::List, Domain::Numeric) => {
                let items = (self.parsers.list)(value).map_err(failure)?;
                non_empty(items).map(Operand::List)
            }
            (ValueShape::List, Domain::Text) => {
                let items = (self.parsers.string_list)(value).map_err(failure)?;
                non_empty(items).map(Operand::Strings)
            }
            (ValueShape::List, Domain::Network) => {
                let prefixes = (self.parsers.prefix_list)(value).map_err(|source| {
                    RuleError::ThresholdReduceFailure {
                        literal: value.to_owned(),
                        kind: FieldKind::Ip,
                        source,
                    }
                })?;
                if prefixes.is_empty() {
                    return Err(failure(LiteralError::new("list is empty").into()));
                }
                Ok(Operand::Prefixes(prefixes))
            }
        }
    }

    /// Evaluate this rule against `record`, caching reduced thresholds.
    ///
    /// # Errors
    ///
    /// - [`RuleError::NotParsed`] if the rule holds no successfully parsed text.
    /// - Path errors: [`RuleError::NoSuchField`], [`RuleError::NotComposite`],
    ///   [`RuleError::NilReference`].
    /// - Kind errors: [`RuleError::UnsupportedFieldKind`],
    ///   [`RuleError::OperatorKindMismatch`].
    /// - Threshold errors: [`RuleError::ThresholdReduceFailure`],
    ///   [`RuleError::InvertedRange`].
    pub fn evaluate(&mut self, record: &dyn Record) -> Result<bool, RuleError> {
        let parsed = self.parsed.as_ref().ok_or(RuleError::NotParsed)?;
        let value = parsed.path.resolve(record)?;
        let result = compare(parsed, &self.parsers, Cache::Fill(&mut self.prepared), &value);
        trace!(rule = %parsed.text, ?result, "evaluated rule");
        result
    }

    /// Evaluate this rule against `record` without writing the cache.
    ///
    /// A cache warmed by [`Rule::evaluate`] for the same field kind is used;
    /// otherwise the threshold is reduced for this call only.
    ///
    /// # Errors
    ///
    /// Same as [`Rule::evaluate`].
    pub fn check(&self, record: &dyn Record) -> Result<bool, RuleError> {
        let parsed = self.parsed.as_ref().ok_or(RuleError::NotParsed)?;
        let value = parsed.path.resolve(record)?;
        compare(parsed, &self.parsers, Cache::ReadOnly(&self.prepared), &value)
    }

    /// Drop the cached threshold without touching the parsed rule.
    pub fn clear_prepared(&mut self) {
        if self.prepared.kind() != PreparedKind::NotPrepared {
            debug!(from = %self.prepared.kind(), "cleared prepared threshold");
        }
        self.prepared = Prepared::NotPrepared;
    }

    #[must_use]
    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    /// The rule text as last parsed successfully.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.parsed.as_ref().map(|p| p.text.as_str())
    }

    #[must_use]
    pub fn field_path(&self) -> Option<&FieldPath> {
        self.parsed.as_ref().map(|p| &p.path)
    }

    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        self.parsed.as_ref().map(|p| p.operator)
    }

    /// The value part of the rule text, trimmed but otherwise unparsed.
    #[must_use]
    pub fn raw_value(&self) -> Option<&str> {
        self.parsed.as_ref().map(|p| p.raw_value.as_str())
    }

    #[must_use]
    pub fn operand(&self) -> Option<&Operand> {
        self.parsed.as_ref().map(|p| &p.operand)
    }

    #[must_use]
    pub fn prepared_kind(&self) -> PreparedKind {
        self.prepared.kind()
    }

    #[must_use]
    pub fn parsers(&self) -> &Parsers {
        &self.parsers
    }

    #[cfg(test)]
    pub(crate) fn parsed(&self) -> Option<&ParsedRule> {
        self.parsed.as_ref()
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parsed {
            Some(p) => write!(f, "{} : {} : {}", p.path, p.operator, p.raw_value),
            None => f.write_str("<unparsed rule>"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.text() {
            Some(text) => serializer.serialize_str(text),
            None => Err(serde::ser::Error::custom(RuleError::NotParsed)),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rule {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Rule::from_text(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::divide_with;
    use crate::types::Document;

    #[test]
    fn parse_populates_parts() {
        let rule = Rule::from_text(" port.rx : in : 10   20 ").unwrap();
        assert_eq!(rule.field_path().unwrap().components(), ["port", "rx"]);
        assert_eq!(rule.operator(), Some(Operator::In));
        assert_eq!(rule.raw_value(), Some("10   20"));
        assert_eq!(
            rule.operand(),
            Some(&Operand::Range {
                min: "10".into(),
                max: "20".into()
            })
        );
        assert_eq!(rule.prepared_kind(), PreparedKind::NotPrepared);
    }

    #[test]
    fn operand_shapes() {
        let list = Rule::from_text("Num1:is:60 -120").unwrap();
        assert_eq!(
            list.operand(),
            Some(&Operand::List(vec!["60".into(), "-120".into()]))
        );

        let strings = Rule::from_text(r#"Str1:same:"a\"b" "c""#).unwrap();
        assert_eq!(
            strings.operand(),
            Some(&Operand::Strings(vec!["a\"b".into(), "c".into()]))
        );

        let prefixes = Rule::from_text("IP1:within:1.1.1.1/24").unwrap();
        let Some(Operand::Prefixes(p)) = prefixes.operand() else {
            panic!("expected prefixes");
        };
        assert_eq!(p[0].to_string(), "1.1.1.0/24");
    }

    #[test]
    fn malformed_rules() {
        let err = Rule::from_text("Num1:==").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { ref rule, .. } if rule == "Num1:=="));

        let err = Rule::from_text("a..b:==:1").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { .. }), "{err}");

        let err = Rule::from_text(":==:1").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { .. }), "{err}");
    }

    #[test]
    fn invalid_operator() {
        let err = Rule::from_text("Num1:*&:100").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperator { ref operator } if operator == "*&"));
        let err = Rule::from_text("Num1 :  : 100").unwrap_err();
        assert!(matches!(err, RuleError::InvalidOperator { ref operator } if operator.is_empty()));
    }

    #[test]
    fn value_shape_failures() {
        for text in ["Num1:in:100", "Num1:==:", "Str1:same:test1", "Num1:is:  "] {
            let err = Rule::from_text(text).unwrap_err();
            assert!(
                matches!(err, RuleError::ValueParseFailure { .. }),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn bad_prefix_is_a_reduce_failure() {
        let err = Rule::from_text("IP1:within:1.1.1.1").unwrap_err();
        assert!(
            matches!(err, RuleError::ThresholdReduceFailure { kind: FieldKind::Ip, .. }),
            "{err}"
        );
    }

    #[test]
    fn custom_hooks_returning_empty_lists_are_rejected() {
        let mut rule = Rule::with_parsers(Parsers::new().list(|_| Ok(Vec::new())));
        let err = rule.parse("Num1:is:1").unwrap_err();
        assert!(matches!(err, RuleError::ValueParseFailure { .. }), "{err}");
    }

    #[test]
    fn failed_reparse_leaves_rule_empty() {
        let mut rule = Rule::from_text("n:>:1").unwrap();
        let doc = Document::new().set("n", 2_i64);
        assert!(rule.evaluate(&doc).unwrap());
        assert!(rule.parse("n:?:1").is_err());
        assert!(!rule.is_parsed());
        assert!(matches!(rule.evaluate(&doc), Err(RuleError::NotParsed)));
        assert!(matches!(Rule::new().check(&doc), Err(RuleError::NotParsed)));
    }

    #[test]
    fn reparse_resets_cache() {
        let mut rule = Rule::from_text("n:>:1").unwrap();
        let doc = Document::new().set("n", 2_i64);
        rule.evaluate(&doc).unwrap();
        assert_eq!(rule.prepared_kind(), PreparedKind::AsInteger);
        rule.parse("n:<:1").unwrap();
        assert_eq!(rule.prepared_kind(), PreparedKind::NotPrepared);
        assert!(!rule.evaluate(&doc).unwrap());
    }

    #[test]
    fn clear_prepared_keeps_the_rule() {
        let mut rule = Rule::from_text("n:>:1").unwrap();
        let doc = Document::new().set("n", 2_i64);
        rule.evaluate(&doc).unwrap();
        rule.clear_prepared();
        assert_eq!(rule.prepared_kind(), PreparedKind::NotPrepared);
        assert_eq!(rule.text(), Some("n:>:1"));
        assert!(rule.evaluate(&doc).unwrap());
    }

    #[test]
    fn custom_divider() {
        let mut rule = Rule::with_parsers(Parsers::new().divider(divide_with('|')));
        rule.parse("stamp | == | 2020/03/31T15:00:00").unwrap();
        assert_eq!(rule.raw_value(), Some("2020/03/31T15:00:00"));
        assert_eq!(rule.to_string(), "stamp : == : 2020/03/31T15:00:00");
    }

    #[test]
    fn display() {
        let rule: Rule = "a.b:notin:1 5".parse().unwrap();
        assert_eq!(rule.to_string(), "a.b : notin : 1 5");
        assert_eq!(Rule::new().to_string(), "<unparsed rule>");
    }
}
