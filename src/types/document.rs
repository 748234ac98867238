use std::collections::HashMap;

use super::field::{FieldValue, Record};
use super::Value;

/// A dynamically shaped record mapping dot-separated field paths to [`Value`]s.
///
/// Intermediate path components become nested records, so
/// `"link.peer.address"` resolves three levels.
#[derive(Debug, Clone, Default)]
pub struct Document {
    data: HashMap<String, Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(Value),
    Nested(Document),
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dot-separated path. Creates intermediate records as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a value at a dot-separated path (mutable reference version).
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        self.insert_segments(&segments, value);
    }

    /// Look up a field by dot-separated path through the [`Record`] protocol.
    ///
    /// Nested records come back as [`FieldValue::Record`], and `None` means some
    /// component is missing or sits below a leaf.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<FieldValue<'_>> {
        let mut segments = path.split('.');
        let mut value = self.field(segments.next()?)?;
        for segment in segments {
            let FieldValue::Record(record) = value else {
                return None;
            };
            value = record.field(segment)?;
        }
        Some(value)
    }

    fn insert_segments(&mut self, segments: &[&str], value: Value) {
        match segments {
            [] => {}
            [last] => {
                self.data.insert((*last).to_owned(), Node::Leaf(value));
            }
            [first, rest @ ..] => {
                let entry = self
                    .data
                    .entry((*first).to_owned())
                    .or_insert_with(|| Node::Nested(Document::new()));
                match entry {
                    Node::Nested(nested) => nested.insert_segments(rest, value),
                    Node::Leaf(_) => {
                        let mut nested = Document::new();
                        nested.insert_segments(rest, value);
                        *entry = Node::Nested(nested);
                    }
                }
            }
        }
    }
}

impl Record for Document {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match self.data.get(name)? {
            Node::Leaf(v) => Some(v.as_field()),
            Node::Nested(nested) => Some(FieldValue::record(nested)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldKind;

    #[test]
    fn set_and_get_simple() {
        let doc = Document::new().set("name", "alice");
        assert!(matches!(doc.get("name"), Some(FieldValue::Str(s)) if s == "alice"));
    }

    #[test]
    fn set_and_get_nested() {
        let doc = Document::new().set("port.stats.rx", 25_i64);
        assert!(matches!(doc.get("port.stats.rx"), Some(FieldValue::Int(25))));
        assert_eq!(doc.get("port.stats").map(|v| v.kind()), Some(FieldKind::Record));
    }

    #[test]
    fn get_missing_returns_none() {
        let doc = Document::new().set("port.rx", 25_i64);
        assert!(doc.get("port.tx").is_none());
        assert!(doc.get("nonexistent").is_none());
        assert!(doc.get("port.rx.bits").is_none());
        assert!(doc.get("").is_none());
    }

    #[test]
    fn overwrite_leaf_with_nested() {
        let doc = Document::new()
            .set("port", "old_value")
            .set("port.rx", 30_i64);
        assert!(matches!(doc.get("port.rx"), Some(FieldValue::Int(30))));
        assert_eq!(doc.get("port").map(|v| v.kind()), Some(FieldKind::Record));
    }

    #[test]
    fn overwrite_value() {
        let doc = Document::new().set("score", 10_i64).set("score", 20_i64);
        assert!(matches!(doc.get("score"), Some(FieldValue::Int(20))));
    }

    #[test]
    fn insert_mutable_ref() {
        let mut doc = Document::new();
        doc.insert("key", Value::Bool(true));
        assert!(matches!(doc.get("key"), Some(FieldValue::Bool(true))));
    }

    #[test]
    fn null_reads_back_as_an_empty_optional() {
        let doc = Document::new().set("link.peer", Value::Null);
        assert!(matches!(doc.get("link.peer"), Some(FieldValue::Optional(None))));
    }

    #[test]
    fn record_exposes_leaves_and_nested_records() {
        let doc = Document::new()
            .set("port.rx", 3_u64)
            .set("peer", None::<i64>);
        assert_eq!(doc.field("port").map(|v| v.kind()), Some(FieldKind::Record));
        assert_eq!(doc.field("peer").map(|v| v.kind()), Some(FieldKind::Optional));
        assert!(doc.field("rx").is_none());

        let Some(FieldValue::Record(port)) = doc.field("port") else {
            panic!("expected a nested record");
        };
        assert!(matches!(port.field("rx"), Some(FieldValue::Uint(3))));
    }
}
