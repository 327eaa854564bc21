/// Constructs a [`Bson`](crate::Bson) value from a literal.
///
/// Array and object literals recurse; any other expression is converted
/// through `Into<Bson>`. Compound expressions such as negative literals or
/// method calls need wrapping parentheses.
///
/// ```
/// use tagbson::{bson, Bson};
///
/// let string = bson!("hello");
/// let array = bson!([5, false, [1, 2]]);
/// let doc = bson!({ "answer": 42, "wrapped": (-20) });
/// # assert_eq!(string, Bson::String("hello".to_owned()));
/// ```
#[macro_export]
macro_rules! bson {
    ([]) => {
        $crate::Bson::Array(::std::vec::Vec::new())
    };

    ([$($val:tt),+ $(,)?]) => {{
        let mut array = ::std::vec::Vec::new();
        $(
            array.push($crate::bson!($val));
        )+
        $crate::Bson::Array(array)
    }};

    ({}) => {
        $crate::Bson::Document($crate::Document::new())
    };

    ({ $($key:tt : $val:tt),+ $(,)? }) => {
        $crate::Bson::Document($crate::doc! { $($key: $val),+ })
    };

    ($other:expr) => {
        $crate::Bson::from($other)
    };
}

/// Constructs an ordered [`Document`](crate::Document) from a literal.
///
/// ```
/// use tagbson::doc;
///
/// let doc = doc! {
///     "hello": "world",
///     "int": 5,
///     "subdoc": { "cat": true },
/// };
/// assert_eq!(doc.get_str("hello"), Ok("world"));
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };

    ( $($key:tt : $val:tt),+ $(,)? ) => {{
        let mut document = $crate::Document::new();
        $(
            document.insert($key, $crate::bson!($val));
        )+
        document
    }};
}
