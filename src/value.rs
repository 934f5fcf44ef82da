use time::{format_description::BorrowedFormatItem, macros::format_description};

/// Fixed render convention for timestamps, `yyyy-MM-dd HH:mm:ss`. The same
/// text is produced no matter which statement kind carries the value.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A typed SQL value. The inner `Option` distinguishes a typed NULL from a
/// set value; a field the caller left unset contributes `Null` (or a typed
/// `None`) and is treated as absent by the statement builders.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Varchar(Option<String>),
    Timestamp(Option<time::PrimitiveDateTime>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
        }
    }

    /// Canonical text form of the value, the one a driver sends over the
    /// wire. Strings pass through unescaped, numbers render in decimal,
    /// timestamps follow [`TIMESTAMP_FORMAT`] bit-exactly.
    pub fn encode(&self) -> String {
        match self {
            Value::Null => "NULL".into(),
            Value::Boolean(None)
            | Value::Int32(None)
            | Value::Int64(None)
            | Value::Float64(None)
            | Value::Varchar(None)
            | Value::Timestamp(None) => "NULL".into(),
            Value::Boolean(Some(v)) => (if *v { "true" } else { "false" }).into(),
            Value::Int32(Some(v)) => itoa::Buffer::new().format(*v).into(),
            Value::Int64(Some(v)) => itoa::Buffer::new().format(*v).into(),
            Value::Float64(Some(v)) => ryu::Buffer::new().format(*v).into(),
            Value::Varchar(Some(v)) => v.clone(),
            Value::Timestamp(Some(v)) => v.format(TIMESTAMP_FORMAT).unwrap_or_else(|e| {
                log::warn!("unchecked timestamp render for {v}: {e}");
                v.to_string()
            }),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => *v,
            Value::Int64(v) => v.and_then(|v| i32::try_from(v).ok()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => v.map(i64::from),
            Value::Int64(v) => *v,
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(Some(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<time::PrimitiveDateTime> {
        match self {
            Value::Timestamp(v) => *v,
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($type:ty => $variant:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::$variant(Some(value.into()))
            }
        }
        impl From<Option<$type>> for Value {
            fn from(value: Option<$type>) -> Self {
                Value::$variant(value.map(Into::into))
            }
        }
    };
}

impl_from!(bool => Boolean);
impl_from!(i32 => Int32);
impl_from!(i64 => Int64);
impl_from!(f64 => Float64);
impl_from!(String => Varchar);
impl_from!(&str => Varchar);
impl_from!(time::PrimitiveDateTime => Timestamp);
