use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, PopulateError, PopulateResult};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::str::FromStr;

/// Two-way conversion between a Rust type and a [Value].
///
/// Entities and projections implement it (usually through `#[derive(Convertible)]`), which is
/// what lets the populate engine address their fields by name in document form.
///
/// `Output` is normally `Self`; borrowed types such as `&str` convert back into an owned type.
pub trait Convertible {
    type Output;

    fn to_value(&self) -> PopulateResult<Value>;
    fn from_value(value: &Value) -> PopulateResult<Self::Output>;
}

fn mapping_error<T>(value: &Value, expected: &str) -> PopulateResult<T> {
    log::error!("Value {} is not {}", value, expected);
    Err(PopulateError::new(
        &format!("Value is not {}", expected),
        ErrorKind::ObjectMappingError,
    ))
}

// Integers accept any integer variant whose number fits the target width, so a
// key stored as i64 still reads back into an i32 field.
macro_rules! impl_convertible_for_integers {
    ($($ty:ty => $variant:ident, $name:literal);* $(;)?) => {
        $(
            impl Convertible for $ty {
                type Output = $ty;

                fn to_value(&self) -> PopulateResult<Value> {
                    Ok(Value::$variant(*self))
                }

                fn from_value(value: &Value) -> PopulateResult<Self> {
                    match value.as_integer().map(<$ty>::try_from) {
                        Some(Ok(v)) => Ok(v),
                        _ => mapping_error(value, $name),
                    }
                }
            }
        )*
    };
}

impl_convertible_for_integers! {
    i8 => I8, "an i8";
    u8 => U8, "a u8";
    i16 => I16, "an i16";
    u16 => U16, "a u16";
    i32 => I32, "an i32";
    u32 => U32, "a u32";
    i64 => I64, "an i64";
    u64 => U64, "a u64";
}

impl Convertible for f32 {
    type Output = f32;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::F32(*self))
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        match value {
            Value::F32(v) => Ok(*v),
            _ => mapping_error(value, "a f32"),
        }
    }
}

impl Convertible for f64 {
    type Output = f64;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::F64(*self))
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        match value.as_decimal() {
            Some(v) => Ok(v),
            None => mapping_error(value, "a f64"),
        }
    }
}

impl Convertible for char {
    type Output = char;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::Char(*self))
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        match value {
            Value::Char(v) => Ok(*v),
            _ => mapping_error(value, "a char"),
        }
    }
}

impl Convertible for String {
    type Output = String;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        match value {
            Value::String(v) => Ok(v.clone()),
            _ => mapping_error(value, "a string"),
        }
    }
}

impl Convertible for &str {
    type Output = String;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_value(value: &Value) -> PopulateResult<Self::Output> {
        String::from_value(value)
    }
}

impl Convertible for bool {
    type Output = bool;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        match value {
            Value::Bool(v) => Ok(*v),
            _ => mapping_error(value, "a bool"),
        }
    }
}

impl Convertible for () {
    type Output = ();

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::Null)
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        match value {
            Value::Null => Ok(()),
            _ => mapping_error(value, "null"),
        }
    }
}

impl Convertible for Document {
    type Output = Document;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(Value::Document(self.clone()))
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        match value {
            Value::Document(v) => Ok(v.clone()),
            _ => mapping_error(value, "a document"),
        }
    }
}

impl Convertible for Value {
    type Output = Value;

    fn to_value(&self) -> PopulateResult<Value> {
        Ok(self.clone())
    }

    fn from_value(value: &Value) -> PopulateResult<Self> {
        Ok(value.clone())
    }
}

impl<T> Convertible for Option<T>
where
    T: Convertible,
{
    type Output = Option<T::Output>;

    fn to_value(&self) -> PopulateResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> PopulateResult<Self::Output> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}

impl<T> Convertible for Box<T>
where
    T: Convertible,
{
    type Output = Box<T::Output>;

    fn to_value(&self) -> PopulateResult<Value> {
        self.as_ref().to_value()
    }

    fn from_value(value: &Value) -> PopulateResult<Self::Output> {
        Ok(Box::new(T::from_value(value)?))
    }
}

/// Sequences read back from arrays. A null reads as an empty sequence, which is the
/// default a projection holds for a field that was excluded from mapping.
impl<T> Convertible for Vec<T>
where
    T: Convertible,
{
    type Output = Vec<T::Output>;

    fn to_value(&self) -> PopulateResult<Value> {
        let mut array = Vec::with_capacity(self.len());
        for item in self {
            array.push(item.to_value()?);
        }
        Ok(Value::Array(array))
    }

    fn from_value(value: &Value) -> PopulateResult<Self::Output> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(array) => array.iter().map(T::from_value).collect(),
            Value::Bytes(bytes) => bytes.iter().map(|b| T::from_value(&Value::U8(*b))).collect(),
            _ => mapping_error(value, "an array"),
        }
    }
}

fn map_to_document<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> PopulateResult<Value>
where
    K: ToString + 'a,
    V: Convertible + 'a,
{
    let mut document = Document::new();
    for (k, v) in entries {
        // keys are stored verbatim, a dotted key must not be split into embedded documents
        document.put_raw(&k.to_string(), v.to_value()?);
    }
    Ok(Value::Document(document))
}

fn parse_key<K: FromStr>(key: &str) -> PopulateResult<K> {
    K::from_str(key).map_err(|_| {
        log::error!("Failed to convert key {} to the map key type", key);
        PopulateError::new(
            &format!("Failed to convert key {} to the map key type", key),
            ErrorKind::ObjectMappingError,
        )
    })
}

impl<K, V> Convertible for BTreeMap<K, V>
where
    K: ToString + FromStr + Ord,
    V: Convertible,
{
    type Output = BTreeMap<K, V::Output>;

    fn to_value(&self) -> PopulateResult<Value> {
        map_to_document(self.iter())
    }

    fn from_value(value: &Value) -> PopulateResult<Self::Output> {
        match value {
            Value::Null => Ok(BTreeMap::new()),
            Value::Document(doc) => {
                let mut result = BTreeMap::new();
                for (k, v) in doc.iter() {
                    result.insert(parse_key(k)?, V::from_value(v)?);
                }
                Ok(result)
            }
            _ => mapping_error(value, "a document"),
        }
    }
}

impl<K, V> Convertible for HashMap<K, V>
where
    K: ToString + FromStr + Eq + Hash,
    V: Convertible,
{
    type Output = HashMap<K, V::Output>;

    fn to_value(&self) -> PopulateResult<Value> {
        map_to_document(self.iter())
    }

    fn from_value(value: &Value) -> PopulateResult<Self::Output> {
        match value {
            Value::Null => Ok(HashMap::new()),
            Value::Document(doc) => {
                let mut result = HashMap::with_capacity(doc.size());
                for (k, v) in doc.iter() {
                    result.insert(parse_key(k)?, V::from_value(v)?);
                }
                Ok(result)
            }
            _ => mapping_error(value, "a document"),
        }
    }
}

macro_rules! impl_convertible_for_tuples {
    ($(($len:literal; $($T:ident),+)),+ $(,)?) => {
        $(
            #[allow(non_snake_case)]
            impl<$($T),+> Convertible for ($($T),+) where $($T: Convertible),+ {
                type Output = ($($T::Output),+);

                fn to_value(&self) -> PopulateResult<Value> {
                    let ($($T),+) = self;
                    Ok(Value::Array(vec![$($T.to_value()?),+]))
                }

                fn from_value(value: &Value) -> PopulateResult<Self::Output> {
                    match value {
                        Value::Array(array) if array.len() == $len => {
                            let mut iter = array.iter();
                            Ok(($($T::from_value(iter.next().unwrap_or(&Value::Null))?),+))
                        }
                        _ => mapping_error(value, concat!("a tuple of ", $len)),
                    }
                }
            }
        )+
    };
}

impl_convertible_for_tuples! {
    (2; T1, T2),
    (3; T1, T2, T3),
    (4; T1, T2, T3, T4),
}

/// Converts a [Value] into `T`'s output type.
pub fn from_value<T>(value: &Value) -> PopulateResult<T::Output>
where
    T: Convertible,
{
    T::from_value(value)
}

/// Converts `data` into a [Value].
pub fn to_value<T>(data: &T) -> PopulateResult<Value>
where
    T: Convertible,
{
    data.to_value()
}
