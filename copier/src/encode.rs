//! Encoding typed values back into the dynamic representation.
//!
//! The encoder resolves struct keys exactly like the decoder does, so a value
//! encoded under a tag namespace decodes back into an equal value under the
//! same namespace.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use copier_value::{Map, Value};
use indexmap::IndexMap;

/// A type that can be turned into a [`Value`].
pub trait Encodable {
    fn to_value(&self, tag: &str) -> Value;
}

/// Writes a struct's fields into an object, for `#[derive(Encodable)]` and
/// for promoting embedded fields.
pub trait EncodeFields {
    fn encode_fields(&self, tag: &str, out: &mut Map);
}

impl<T: EncodeFields + ?Sized> EncodeFields for Box<T> {
    fn encode_fields(&self, tag: &str, out: &mut Map) {
        (**self).encode_fields(tag, out)
    }
}

impl<T: EncodeFields> EncodeFields for Option<T> {
    fn encode_fields(&self, tag: &str, out: &mut Map) {
        if let Some(inner) = self {
            inner.encode_fields(tag, out);
        }
    }
}

macro_rules! impl_encodable_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Encodable for $t {
                fn to_value(&self, _tag: &str) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_encodable_scalar!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Encodable for str {
    fn to_value(&self, _tag: &str) -> Value {
        Value::String(self.to_string())
    }
}

impl Encodable for String {
    fn to_value(&self, _tag: &str) -> Value {
        Value::String(self.clone())
    }
}

impl Encodable for Value {
    fn to_value(&self, _tag: &str) -> Value {
        self.clone()
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn to_value(&self, tag: &str) -> Value {
        self.as_ref().map_or(Value::Null, |inner| inner.to_value(tag))
    }
}

impl<T: Encodable + ?Sized> Encodable for Box<T> {
    fn to_value(&self, tag: &str) -> Value {
        (**self).to_value(tag)
    }
}

impl<T: Encodable + ?Sized> Encodable for Rc<T> {
    fn to_value(&self, tag: &str) -> Value {
        (**self).to_value(tag)
    }
}

impl<T: Encodable + ?Sized> Encodable for Arc<T> {
    fn to_value(&self, tag: &str) -> Value {
        (**self).to_value(tag)
    }
}

impl<T: Encodable> Encodable for [T] {
    fn to_value(&self, tag: &str) -> Value {
        Value::Array(self.iter().map(|item| item.to_value(tag)).collect())
    }
}

impl<T: Encodable, const N: usize> Encodable for [T; N] {
    fn to_value(&self, tag: &str) -> Value {
        self.as_slice().to_value(tag)
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn to_value(&self, tag: &str) -> Value {
        self.as_slice().to_value(tag)
    }
}

impl<T: Encodable> Encodable for VecDeque<T> {
    fn to_value(&self, tag: &str) -> Value {
        Value::Array(self.iter().map(|item| item.to_value(tag)).collect())
    }
}

fn encode_entries<'a, K, V, I>(entries: I, tag: &str) -> Value
where
    K: AsRef<str> + 'a,
    V: Encodable + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.to_value(tag)))
            .collect(),
    )
}

impl<K: AsRef<str>, V: Encodable, S> Encodable for HashMap<K, V, S> {
    fn to_value(&self, tag: &str) -> Value {
        encode_entries(self, tag)
    }
}

impl<K: AsRef<str>, V: Encodable> Encodable for BTreeMap<K, V> {
    fn to_value(&self, tag: &str) -> Value {
        encode_entries(self, tag)
    }
}

impl<K: AsRef<str>, V: Encodable, S> Encodable for IndexMap<K, V, S> {
    fn to_value(&self, tag: &str) -> Value {
        encode_entries(self, tag)
    }
}

#[cfg(test)]
mod tests {
    use copier_value::value;
    use rstest::rstest;

    use super::*;

    #[rstest(
        input,
        expected,
        case(true.to_value("json"), value!(true)),
        case((-3i8).to_value("json"), value!((-3))),
        case(3u32.to_value("json"), Value::Uint(3)),
        case(1.5f32.to_value("json"), value!(1.5)),
        case("s".to_value("json"), value!("s")),
        case(None::<i32>.to_value("json"), value!(null)),
        case(Some(Box::new(4i64)).to_value("json"), value!(4)),
        case(vec![Some(1i32), None].to_value("json"), value!([1, null])),
        case([[1u8], [2u8]].to_value("json"), value!([[(Value::Uint(1))], [(Value::Uint(2))]])),
    )]
    fn test_encode(input: Value, expected: Value) {
        assert_eq!(expected, input);
    }

    #[test]
    fn test_encode_map() {
        let input = BTreeMap::from([("b", 2i32), ("a", 1)]);
        assert_eq!(value!({ "a": 1, "b": 2 }), input.to_value("json"));
    }
}
