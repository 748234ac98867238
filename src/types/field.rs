use std::borrow::Cow;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, TimeDelta, Utc};

use super::operator::Domain;

/// A value that exposes named fields to rules.
///
/// Implement it for any struct a rule should look into:
///
/// ```
/// use fieldrule::{FieldValue, Record};
///
/// struct Port {
///     name: String,
///     rx_errors: u64,
/// }
///
/// impl Record for Port {
///     fn field(&self, name: &str) -> Option<FieldValue<'_>> {
///         match name {
///             "Name" => Some(self.name.as_str().into()),
///             "RxErrors" => Some(self.rx_errors.into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Look up a field by name. `None` means the record has no such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl fmt::Debug for dyn Record + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Record { .. }")
    }
}

/// A field value as seen by the rule engine, tagged with its runtime kind.
#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Cow<'a, str>),
    Timestamp(DateTime<Utc>),
    Duration(TimeDelta),
    Ip(IpAddr),
    /// A value with no comparator; it resolves but cannot be compared.
    Bool(bool),
    /// A nested record; path resolution can step into it.
    Record(&'a dyn Record),
    /// An optional reference. `None` is an empty reference.
    Optional(Option<Box<FieldValue<'a>>>),
}

/// Runtime kind tag of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Unsigned,
    Float,
    String,
    Timestamp,
    Duration,
    Ip,
    Bool,
    Record,
    Optional,
}

impl<'a> FieldValue<'a> {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Integer,
            FieldValue::Uint(_) => FieldKind::Unsigned,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Str(_) => FieldKind::String,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::Duration(_) => FieldKind::Duration,
            FieldValue::Ip(_) => FieldKind::Ip,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Record(_) => FieldKind::Record,
            FieldValue::Optional(_) => FieldKind::Optional,
        }
    }

    /// Wrap a nested record.
    #[must_use]
    pub fn record(record: &'a dyn Record) -> Self {
        FieldValue::Record(record)
    }

    /// Wrap an optional value as an optional reference.
    #[must_use]
    pub fn optional(value: Option<FieldValue<'a>>) -> Self {
        FieldValue::Optional(value.map(Box::new))
    }

    /// An empty optional reference.
    #[must_use]
    pub fn null() -> Self {
        FieldValue::Optional(None)
    }
}

impl FieldKind {
    /// The comparison domain for this kind, or `None` if no comparator applies.
    #[must_use]
    pub fn domain(self) -> Option<Domain> {
        match self {
            FieldKind::Integer
            | FieldKind::Unsigned
            | FieldKind::Float
            | FieldKind::Timestamp
            | FieldKind::Duration => Some(Domain::Numeric),
            FieldKind::String => Some(Domain::Text),
            FieldKind::Ip => Some(Domain::Network),
            FieldKind::Bool | FieldKind::Record | FieldKind::Optional => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "integer",
            FieldKind::Unsigned => "unsigned",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Duration => "duration",
            FieldKind::Ip => "ip address",
            FieldKind::Bool => "bool",
            FieldKind::Record => "record",
            FieldKind::Optional => "optional",
        };
        f.write_str(name)
    }
}

macro_rules! impl_from_widening {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(
            impl From<$source> for FieldValue<'_> {
                fn from(v: $source) -> Self {
                    FieldValue::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

impl_from_widening!(Int(i64): i8, i16, i32, i64);
impl_from_widening!(Uint(u64): u8, u16, u32, u64);
impl_from_widening!(Float(f64): f32, f64);

impl From<isize> for FieldValue<'_> {
    fn from(v: isize) -> Self {
        FieldValue::Int(i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX }))
    }
}

impl From<usize> for FieldValue<'_> {
    fn from(v: usize) -> Self {
        FieldValue::Uint(u64::try_from(v).unwrap_or(u64::MAX))
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(v: &'a str) -> Self {
        FieldValue::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(v: &'a String) -> Self {
        FieldValue::Str(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(v: String) -> Self {
        FieldValue::Str(Cow::Owned(v))
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl From<TimeDelta> for FieldValue<'_> {
    fn from(v: TimeDelta) -> Self {
        FieldValue::Duration(v)
    }
}

impl From<IpAddr> for FieldValue<'_> {
    fn from(v: IpAddr) -> Self {
        FieldValue::Ip(v)
    }
}

impl From<Ipv4Addr> for FieldValue<'_> {
    fn from(v: Ipv4Addr) -> Self {
        FieldValue::Ip(IpAddr::V4(v))
    }
}

impl From<Ipv6Addr> for FieldValue<'_> {
    fn from(v: Ipv6Addr) -> Self {
        FieldValue::Ip(IpAddr::V6(v))
    }
}

impl<'a, T: Into<FieldValue<'a>>> From<Option<T>> for FieldValue<'a> {
    fn from(v: Option<T>) -> Self {
        FieldValue::optional(v.map(Into::into))
    }
}
