/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Objects take string-literal keys and sort them on construction; arrays
/// keep their element order. The extra keyword `undefined` names the
/// undefined value, which the text serializer elides inside containers and
/// merges treat as a deletion. Expressions work as values when they have a
/// `From` conversion into `Value`; wrap anything that is not a single token
/// in parentheses.
///
/// ```rust
/// use incjson::json;
///
/// let doc = json!({
///     "name": "Alice",
///     "score": (2 * 21),
///     "tags": ["a", "b"],
///     "skip": undefined
/// });
/// assert_eq!(incjson::stringify(&doc), r#"{"name":"Alice","score":42,"tags":["a","b"]}"#);
/// ```
#[macro_export]
macro_rules! json {
    (null) => {
        $crate::Value::null()
    };

    (undefined) => {
        $crate::Value::undefined()
    };

    (true) => {
        $crate::Value::from(true)
    };

    (false) => {
        $crate::Value::from(false)
    };

    ([]) => {
        $crate::Value::from(::std::vec::Vec::<$crate::Value>::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::from(<[_]>::into_vec(::std::boxed::Box::new([
            $($crate::json!($elem)),*
        ])))
    };

    ({}) => {
        $crate::Value::from(::std::vec::Vec::<$crate::KeyValue>::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::Value::from(<[_]>::into_vec(::std::boxed::Box::new([
            $($crate::KeyValue::new($key, $crate::json!($value))),*
        ])))
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
