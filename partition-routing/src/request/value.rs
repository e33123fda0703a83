use bytes::{BufMut, Bytes, BytesMut};

/// Length of the signed 32-bit length prefix in front of every serialized value.
pub const VALUE_LENGTH_PREFIX_LEN: usize = 4;

const NULL_INT_VALUE: i32 = -1;
const NOT_SET_INT_VALUE: i32 = -2;

/// Bound value which could be an array of bytes, null and non-set values.
#[derive(Debug, Clone, PartialEq, Ord, PartialOrd, Eq, Hash)]
pub enum Value {
    Some(Vec<u8>),
    Null,
    NotSet,
}

impl Value {
    /// Serializes the value as a length-prefixed buffer, as it is sent on the wire.
    pub fn serialize(&self) -> Bytes {
        match self {
            Value::Null => Bytes::copy_from_slice(&NULL_INT_VALUE.to_be_bytes()),
            Value::NotSet => Bytes::copy_from_slice(&NOT_SET_INT_VALUE.to_be_bytes()),
            Value::Some(value) => {
                let mut buffer = BytesMut::with_capacity(VALUE_LENGTH_PREFIX_LEN + value.len());
                buffer.put_i32(value.len() as i32);
                buffer.put_slice(value);
                buffer.freeze()
            }
        }
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Value::Some(value)
    }
}

impl From<&[u8]> for Value {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Value::Some(value.to_vec())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::Some(value.into_bytes())
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Some(value.as_bytes().to_vec())
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Some(vec![value as u8])
    }
}

macro_rules! value_from_be_bytes {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::Some(value.to_be_bytes().to_vec())
                }
            }
        )*
    };
}

value_from_be_bytes!(i8, i16, i32, i64, f32, f64);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
