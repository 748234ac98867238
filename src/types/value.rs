use std::borrow::Cow;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, TimeDelta, Utc};

use super::field::FieldValue;

/// An owned leaf value stored in a [`Document`](super::Document).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit unsigned integer.
    Uint(u64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// A point in time, UTC.
    Timestamp(DateTime<Utc>),
    /// A signed span of time.
    Duration(TimeDelta),
    /// An IPv4 or IPv6 address.
    Ip(IpAddr),
    /// An empty optional reference.
    Null,
}

impl Value {
    /// Borrow this value as a [`FieldValue`] for the rule engine.
    #[must_use]
    pub fn as_field(&self) -> FieldValue<'_> {
        match self {
            Value::Int(v) => FieldValue::Int(*v),
            Value::Uint(v) => FieldValue::Uint(*v),
            Value::Float(v) => FieldValue::Float(*v),
            Value::Bool(v) => FieldValue::Bool(*v),
            Value::String(v) => FieldValue::Str(Cow::Borrowed(v)),
            Value::Timestamp(v) => FieldValue::Timestamp(*v),
            Value::Duration(v) => FieldValue::Duration(*v),
            Value::Ip(v) => FieldValue::Ip(*v),
            Value::Null => FieldValue::null(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint(u64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Duration(v)
    }
}

impl From<IpAddr> for Value {
    fn from(v: IpAddr) -> Self {
        Value::Ip(v)
    }
}

impl From<Ipv4Addr> for Value {
    fn from(v: Ipv4Addr) -> Self {
        Value::Ip(IpAddr::V4(v))
    }
}

impl From<Ipv6Addr> for Value {
    fn from(v: Ipv6Addr) -> Self {
        Value::Ip(IpAddr::V6(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Timestamp(v) => write!(f, "{}", v.format(crate::parse::TIMESTAMP_FORMAT)),
            Value::Duration(v) => write!(f, "{v}"),
            Value::Ip(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
        }
    }
}
