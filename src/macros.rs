/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Lists and dicts nest freely; any other token tree is converted with
/// `Value::from`, so expressions need parentheses when they are more than a
/// single token (`(x + 1)`), negative numbers excepted.
///
/// ```rust
/// use hipack::{hipack, Value};
///
/// let offset = 3;
/// let value = hipack!({
///     "name": "probe",
///     "enabled": true,
///     "range": [-1.5, 2.5],
///     "limits": { "low": -10, "high": (offset * 10) }
/// });
///
/// assert_eq!(value.get("limits").and_then(|l| l.get("high")), Some(&Value::from(30)));
/// ```
#[macro_export]
macro_rules! hipack {
    (@list [$($elems:expr,)*]) => {
        vec![$($elems),*]
    };

    (@list [$($elems:expr,)*] - $value:tt $(, $($rest:tt)*)?) => {
        $crate::hipack!(@list [$($elems,)* $crate::hipack!(- $value),] $($($rest)*)?)
    };

    (@list [$($elems:expr,)*] $value:tt $(, $($rest:tt)*)?) => {
        $crate::hipack!(@list [$($elems,)* $crate::hipack!($value),] $($($rest)*)?)
    };

    (@dict $dict:ident) => {};

    (@dict $dict:ident $key:literal : - $value:tt $(, $($rest:tt)*)?) => {
        $dict.insert(::std::string::ToString::to_string(&$key), $crate::hipack!(- $value));
        $crate::hipack!(@dict $dict $($($rest)*)?);
    };

    (@dict $dict:ident $key:literal : $value:tt $(, $($rest:tt)*)?) => {
        $dict.insert(::std::string::ToString::to_string(&$key), $crate::hipack!($value));
        $crate::hipack!(@dict $dict $($($rest)*)?);
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($tt:tt)+ ]) => {
        $crate::Value::List($crate::hipack!(@list [] $($tt)+))
    };

    ({}) => {
        $crate::Value::Dict($crate::Dict::new())
    };

    ({ $($tt:tt)+ }) => {{
        let mut dict = $crate::Dict::new();
        $crate::hipack!(@dict dict $($tt)+);
        $crate::Value::Dict(dict)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
