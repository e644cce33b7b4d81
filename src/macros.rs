/// Construct a [`Value::Map`][crate::Value::Map] using literal syntax.
///
/// Values can be `None`, nested maps `{ ... }`, lists `[ ... ]` or any
/// expression that implements `Into<Value>`.
///
/// ```
/// let value = drip::value! {
///     user: {
///         name: "John Smith",
///         age: 42,
///         nickname: None,
///     },
///     tags: ["admin", (1 + 2)],
/// };
/// ```
#[macro_export]
macro_rules! value {
    ($($tt:tt)*) => {{
        #[allow(unused_mut)]
        let mut map = $crate::value::Map::<::std::string::String, $crate::Value>::new();
        $crate::_value_map!(map $($tt)*);
        $crate::Value::Map(map)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value_map {
    // Done.
    ($map:ident) => {};

    // Separator.
    ($map:ident , $($rest:tt)*) => {
        $crate::_value_map!($map $($rest)*);
    };

    // Next value is `None`.
    ($map:ident $key:ident : None $($rest:tt)*) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::Value::None);
        $crate::_value_map!($map $($rest)*);
    };

    // Next value is a map.
    ($map:ident $key:ident : { $($inner:tt)* } $($rest:tt)*) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::value!($($inner)*));
        $crate::_value_map!($map $($rest)*);
    };

    // Next value is a list.
    ($map:ident $key:ident : [ $($inner:tt)* ] $($rest:tt)*) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::_value_list!($($inner)*));
        $crate::_value_map!($map $($rest)*);
    };

    // Next value is an expression followed by a comma.
    ($map:ident $key:ident : $value:expr , $($rest:tt)*) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::Value::from($value));
        $crate::_value_map!($map $($rest)*);
    };

    // Last value is an expression with no trailing comma.
    ($map:ident $key:ident : $value:expr) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::Value::from($value));
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value_list {
    ($($tt:tt)*) => {{
        #[allow(unused_mut)]
        let mut list = $crate::value::List::<$crate::Value>::new();
        $crate::_value_list_items!(list $($tt)*);
        $crate::Value::List(list)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value_list_items {
    ($list:ident) => {};

    ($list:ident , $($rest:tt)*) => {
        $crate::_value_list_items!($list $($rest)*);
    };

    ($list:ident None $($rest:tt)*) => {
        $list.push($crate::Value::None);
        $crate::_value_list_items!($list $($rest)*);
    };

    ($list:ident { $($inner:tt)* } $($rest:tt)*) => {
        $list.push($crate::value!($($inner)*));
        $crate::_value_list_items!($list $($rest)*);
    };

    ($list:ident [ $($inner:tt)* ] $($rest:tt)*) => {
        $list.push($crate::_value_list!($($inner)*));
        $crate::_value_list_items!($list $($rest)*);
    };

    ($list:ident $value:expr , $($rest:tt)*) => {
        $list.push($crate::Value::from($value));
        $crate::_value_list_items!($list $($rest)*);
    };

    ($list:ident $value:expr) => {
        $list.push($crate::Value::from($value));
    };
}
