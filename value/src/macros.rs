/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Object keys must be string literals. Anything that is not `null`, an
/// array or an object goes through `Value::from`, so negative numbers and
/// other multi-token expressions need parentheses: `value!((-1))`.
///
/// ```
/// use copier_value::{Value, value};
///
/// let v = value!({ "a": [1, null, "x"], "b": (-2.5) });
/// assert_eq!(v.get("b"), Some(&Value::Float(-2.5)));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };
    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::Value::Array(::std::vec![ $( $crate::value!($elem) ),+ ])
    };
    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };
    ({ $($key:literal : $val:tt),+ $(,)? }) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert(::std::string::String::from($key), $crate::value!($val));
        )+
        $crate::Value::Object(map)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
