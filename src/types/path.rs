use std::fmt;

use crate::parse::LiteralError;

use super::error::RuleError;
use super::field::{FieldValue, Record};

/// Ordered, non-empty list of field names locating a value inside nested records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    components: Vec<String>,
}

impl FieldPath {
    /// Build a path from already-split components.
    ///
    /// # Errors
    ///
    /// Returns a [`LiteralError`] if there are no components or any component is empty.
    pub fn new(components: Vec<String>) -> Result<Self, LiteralError> {
        if components.is_empty() {
            return Err(LiteralError::new("field path is empty"));
        }
        if components.iter().any(String::is_empty) {
            return Err(LiteralError::new(format!(
                "field path '{}' has an empty component",
                components.join(".")
            )));
        }
        Ok(Self { components })
    }

    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Walk `record` along this path and return the terminal value.
    ///
    /// Optional references met on the way, and at the end, are dereferenced.
    ///
    /// # Errors
    ///
    /// - [`RuleError::NilReference`] if an optional reference on the path is empty.
    /// - [`RuleError::NotComposite`] if the path continues past a non-record value.
    /// - [`RuleError::NoSuchField`] if a record has no field with the next name.
    pub fn resolve<'r>(&self, record: &'r dyn Record) -> Result<FieldValue<'r>, RuleError> {
        let mut current = FieldValue::Record(record);
        for (depth, name) in self.components.iter().enumerate() {
            current = match self.deref(current, depth)? {
                FieldValue::Record(inner) => {
                    inner
                        .field(name)
                        .ok_or_else(|| RuleError::NoSuchField {
                            path: self.prefix(depth + 1),
                            field: name.clone(),
                        })?
                }
                _ => {
                    return Err(RuleError::NotComposite {
                        path: self.prefix(depth),
                    })
                }
            };
        }
        self.deref(current, self.components.len())
    }

    fn deref<'r>(&self, mut value: FieldValue<'r>, depth: usize) -> Result<FieldValue<'r>, RuleError> {
        loop {
            match value {
                FieldValue::Optional(Some(inner)) => value = *inner,
                FieldValue::Optional(None) => {
                    return Err(RuleError::NilReference {
                        path: self.prefix(depth),
                    })
                }
                other => return Ok(other),
            }
        }
    }

    fn prefix(&self, depth: usize) -> String {
        self.components[..depth].join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("."))
    }
}
