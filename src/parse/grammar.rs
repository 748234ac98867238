use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BoxError, IpPrefix};

use super::error::LiteralError;

/// The three raw parts of a rule, as produced by a divider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleParts {
    pub path: String,
    pub operator: String,
    pub value: String,
}

// -- Divider ----------------------------------------------------------------

/// Default divider: `field_path : operator : value`.
///
/// Only the first two `:` separate parts, so the value may itself contain
/// colons (IPv6 prefixes, timestamps). Each part is trimmed.
///
/// # Errors
///
/// Fails when the text holds fewer than two delimiters.
pub fn divide(rule: &str) -> Result<RuleParts, BoxError> {
    divide_on(rule, ':')
}

/// Build a divider that separates parts on `delimiter` instead of `:`.
pub fn divide_with(
    delimiter: char,
) -> impl Fn(&str) -> Result<RuleParts, BoxError> + Clone + Send + Sync + 'static {
    move |rule| divide_on(rule, delimiter)
}

fn divide_on(rule: &str, delimiter: char) -> Result<RuleParts, BoxError> {
    let parts: Vec<&str> = rule.trim().splitn(3, delimiter).map(str::trim).collect();
    match parts[..] {
        [path, operator, value] => Ok(RuleParts {
            path: path.to_owned(),
            operator: operator.to_owned(),
            value: value.to_owned(),
        }),
        _ => Err(LiteralError::new(format!(
            "expected 3 parts separated by '{delimiter}', found {}",
            parts.len()
        ))
        .into()),
    }
}

// -- Field paths ------------------------------------------------------------

/// Default field-path splitter: `a.b.c` becomes `["a", "b", "c"]`.
///
/// # Errors
///
/// Never fails; empty components are rejected later by [`FieldPath`](crate::FieldPath).
pub fn split_path(path: &str) -> Result<Vec<String>, BoxError> {
    Ok(path.split('.').map(str::to_owned).collect())
}

/// Build a field-path splitter on `separator` instead of `.`.
pub fn split_path_with(
    separator: char,
) -> impl Fn(&str) -> Result<Vec<String>, BoxError> + Clone + Send + Sync + 'static {
    move |path| Ok(path.split(separator).map(|s| s.trim().to_owned()).collect())
}

// -- Value shapes -----------------------------------------------------------

/// Default range parser: `min max`, whitespace separated.
///
/// # Errors
///
/// Fails unless exactly two tokens are present.
pub fn parse_range(value: &str) -> Result<(String, String), BoxError> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    match tokens[..] {
        [min, max] => Ok((min.to_owned(), max.to_owned())),
        _ => Err(LiteralError::new(format!(
            "expected a 'min max' pair, found {} value(s)",
            tokens.len()
        ))
        .into()),
    }
}

/// Default list parser: `v1 v2 ... vn`, whitespace separated.
///
/// # Errors
///
/// Fails when the list is empty.
pub fn parse_list(value: &str) -> Result<Vec<String>, BoxError> {
    let items: Vec<String> = value.split_whitespace().map(str::to_owned).collect();
    if items.is_empty() {
        return Err(LiteralError::new("list is empty").into());
    }
    Ok(items)
}

// Lazy match up to a closing quote that is not preceded by a backslash, or `""`.
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?U)".*[^\\]"|"""#).expect("valid regex"));

/// Default string-list parser: `"s1" "s2" ...` with `\"` as the escaped quote.
///
/// Text outside quoted segments is skipped, so `a "b"` yields `["b"]`.
///
/// # Errors
///
/// Fails when no quoted segment is found.
pub fn parse_string_list(value: &str) -> Result<Vec<String>, BoxError> {
    let items: Vec<String> = QUOTED
        .find_iter(value)
        .map(|m| {
            let s = m.as_str();
            s[1..s.len() - 1].replace(r#"\""#, "\"")
        })
        .collect();
    if items.is_empty() {
        return Err(LiteralError::new("no double-quoted string found").into());
    }
    Ok(items)
}

/// Default prefix-list parser: `cidr1 cidr2 ...`, whitespace separated.
///
/// # Errors
///
/// Fails when the list is empty or any token is not a CIDR prefix.
pub fn parse_prefix_list(value: &str) -> Result<Vec<IpPrefix>, BoxError> {
    let prefixes = value
        .split_whitespace()
        .map(str::parse::<IpPrefix>)
        .collect::<Result<Vec<_>, _>>()?;
    if prefixes.is_empty() {
        return Err(LiteralError::new("prefix list is empty").into());
    }
    Ok(prefixes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_trims_parts() {
        let parts = divide(" Num1 :  ==: -120 ").unwrap();
        assert_eq!(parts.path, "Num1");
        assert_eq!(parts.operator, "==");
        assert_eq!(parts.value, "-120");
    }

    #[test]
    fn divide_keeps_colons_in_value() {
        let parts = divide("IP2:within:2001:dead::99/64").unwrap();
        assert_eq!(parts.operator, "within");
        assert_eq!(parts.value, "2001:dead::99/64");
    }

    #[test]
    fn divide_too_few_parts() {
        let err = divide("Num1:==").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected 3 parts separated by ':', found 2"
        );
    }

    #[test]
    fn divide_keeps_empty_parts() {
        let parts = divide(" : : ").unwrap();
        assert_eq!(parts.path, "");
        assert_eq!(parts.operator, "");
        assert_eq!(parts.value, "");
    }

    #[test]
    fn divide_with_custom_delimiter() {
        let divider = divide_with('|');
        let parts = divider("Stamp1 | == | 2020/03/31T15:00:00").unwrap();
        assert_eq!(parts.path, "Stamp1");
        assert_eq!(parts.value, "2020/03/31T15:00:00");
    }

    #[test]
    fn split_path_dotted() {
        assert_eq!(split_path("a.b.c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(split_path("a").unwrap(), vec!["a"]);
    }

    #[test]
    fn split_path_custom_separator() {
        let splitter = split_path_with('/');
        assert_eq!(splitter("net / mgmt").unwrap(), vec!["net", "mgmt"]);
    }

    #[test]
    fn range_requires_two_tokens() {
        assert_eq!(
            parse_range("10   20").unwrap(),
            ("10".to_owned(), "20".to_owned())
        );
        assert!(parse_range("100").is_err());
        assert!(parse_range("1 2 3").is_err());
    }

    #[test]
    fn list_splits_on_whitespace() {
        assert_eq!(parse_list("60 -120\t130").unwrap(), vec!["60", "-120", "130"]);
        assert!(parse_list("   ").is_err());
    }

    #[test]
    fn string_list_unescapes_quotes() {
        assert_eq!(
            parse_string_list(r#""a\"b" "c""#).unwrap(),
            vec!["a\"b", "c"]
        );
    }

    #[test]
    fn string_list_skips_unquoted_text() {
        assert_eq!(parse_string_list(r#"test1 "test2""#).unwrap(), vec!["test2"]);
        assert_eq!(
            parse_string_list(r#""test2" : "test1""#).unwrap(),
            vec!["test2", "test1"]
        );
    }

    #[test]
    fn string_list_escaped_quote_inside() {
        assert_eq!(
            parse_string_list(r#""\"inside\"outside" "test2""#).unwrap(),
            vec!["\"inside\"outside", "test2"]
        );
    }

    #[test]
    fn string_list_empty_string_literal() {
        assert_eq!(parse_string_list(r#""""#).unwrap(), vec![""]);
    }

    #[test]
    fn string_list_without_quotes_fails() {
        let err = parse_string_list("test1").unwrap_err();
        assert_eq!(err.to_string(), "no double-quoted string found");
    }

    #[test]
    fn prefix_list_parses_each_token() {
        let prefixes = parse_prefix_list("1.1.1.1/24 2001:dead::1/64").unwrap();
        assert_eq!(prefixes.len(), 2);
        assert_eq!(prefixes[0].to_string(), "1.1.1.0/24");
    }

    #[test]
    fn prefix_list_fails_on_bare_address() {
        let err = parse_prefix_list("1.1.1.1 2.2.2.2/32").unwrap_err();
        assert_eq!(err.to_string(), "missing prefix length in '1.1.1.1'");
        assert!(parse_prefix_list("").is_err());
    }
}
