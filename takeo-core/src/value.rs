use crate::{Error, Result};
use rust_decimal::Decimal;
use std::{fmt, mem};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed scalar exchanged with the store.
///
/// Every variant carries an `Option`, `None` being a typed `NULL`. The untyped
/// `Value::Null` is used when the type is not known (for example a missing
/// nullable column in a dynamic record).
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l), Self::Decimal(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Value {
    pub fn same_type(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    /// The same variant with no content.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(..) => Value::Decimal(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(..) => "Boolean",
            Value::Int16(..) => "Int16",
            Value::Int32(..) => "Int32",
            Value::Int64(..) => "Int64",
            Value::Float32(..) => "Float32",
            Value::Float64(..) => "Float64",
            Value::Decimal(..) => "Decimal",
            Value::Varchar(..) => "Varchar",
            Value::Blob(..) => "Blob",
            Value::Date(..) => "Date",
            Value::Time(..) => "Time",
            Value::Timestamp(..) => "Timestamp",
            Value::TimestampWithTimezone(..) => "TimestampWithTimezone",
            Value::Uuid(..) => "Uuid",
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int16(Some(v)) => Some(*v as i64),
            Value::Int32(Some(v)) => Some(*v as i64),
            Value::Int64(Some(v)) => Some(*v),
            _ => None,
        }
    }

    /// Convert this value into the variant of `prototype`.
    ///
    /// Only straight assignments are performed: the same variant, an integer
    /// width change that fits the target range, or `Float32` widening into
    /// `Float64`. A `NULL` of any type becomes the `NULL` of the target type.
    /// `Value::Null` as prototype accepts anything.
    pub fn try_as(self, prototype: &Value) -> Result<Value> {
        if matches!(prototype, Value::Null) || self.same_type(prototype) {
            return Ok(self);
        }
        if self.is_null() {
            return Ok(prototype.as_null());
        }
        let converted = match (prototype, &self) {
            (Value::Int16(..), v) => v
                .as_integer()
                .and_then(|v| i16::try_from(v).ok())
                .map(|v| Value::Int16(Some(v))),
            (Value::Int32(..), v) => v
                .as_integer()
                .and_then(|v| i32::try_from(v).ok())
                .map(|v| Value::Int32(Some(v))),
            (Value::Int64(..), v) => v.as_integer().map(|v| Value::Int64(Some(v))),
            (Value::Float64(..), Value::Float32(Some(v))) => Some(Value::Float64(Some(*v as f64))),
            _ => None,
        };
        converted.ok_or_else(|| {
            Error::msg(format!(
                "Cannot assign {} to a column of type {}",
                self,
                prototype.type_name()
            ))
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "NULL::{}", self.type_name());
        }
        match self {
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Int16(Some(v)) => write!(f, "{v}::Int16"),
            Value::Int32(Some(v)) => write!(f, "{v}::Int32"),
            Value::Int64(Some(v)) => write!(f, "{v}::Int64"),
            Value::Float32(Some(v)) => write!(f, "{v}::Float32"),
            Value::Float64(Some(v)) => write!(f, "{v}::Float64"),
            Value::Decimal(Some(v)) => write!(f, "{v}::Decimal"),
            Value::Varchar(Some(v)) => write!(f, "{v:?}"),
            Value::Blob(Some(v)) => write!(f, "<{} bytes>", v.len()),
            Value::Date(Some(v)) => write!(f, "{v}"),
            Value::Time(Some(v)) => write!(f, "{v}"),
            Value::Timestamp(Some(v)) => write!(f, "{v}"),
            Value::TimestampWithTimezone(Some(v)) => write!(f, "{v}"),
            Value::Uuid(Some(v)) => write!(f, "{v}"),
            _ => Ok(()),
        }
    }
}

/// Declared SQL type for a column whose shape is described by `prototype`.
///
/// Used when a derived entity does not override the type explicitly.
pub fn declared_type(prototype: &Value, auto_increment: bool) -> &'static str {
    match (prototype, auto_increment) {
        (Value::Int16(..), true) => "SMALLSERIAL",
        (Value::Int32(..), true) => "SERIAL",
        (Value::Int64(..), true) => "BIGSERIAL",
        (Value::Boolean(..), _) => "BOOLEAN",
        (Value::Int16(..), _) => "SMALLINT",
        (Value::Int32(..), _) => "INTEGER",
        (Value::Int64(..), _) => "BIGINT",
        (Value::Float32(..), _) => "REAL",
        (Value::Float64(..), _) => "DOUBLE PRECISION",
        (Value::Decimal(..), _) => "NUMERIC",
        (Value::Varchar(..), _) => "TEXT",
        (Value::Blob(..), _) => "BYTEA",
        (Value::Date(..), _) => "DATE",
        (Value::Time(..), _) => "TIME",
        (Value::Timestamp(..), _) => "TIMESTAMP",
        (Value::TimestampWithTimezone(..), _) => "TIMESTAMPTZ",
        (Value::Uuid(..), _) => "UUID",
        (Value::Null, _) => "TEXT",
    }
}
