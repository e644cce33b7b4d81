//! Miscellaneous filters.
//!
//! These are plain functions over [`Value`]s that a renderer can register
//! under the names `index` and `jsonify`.

use crate::Value;
#[cfg(feature = "serde")]
use crate::{Error, Result};

/// Returns the element of a list at the given position.
///
/// Negative positions count from the end. Positions outside the list, and
/// values that are not lists, give [`Value::None`].
///
/// ```
/// use drip::filters::index;
/// use drip::Value;
///
/// let list = Value::from([1, 2, 3]);
/// assert_eq!(index(&list, 0), Value::Integer(1));
/// assert_eq!(index(&list, -1), Value::Integer(3));
/// assert_eq!(index(&list, 5), Value::None);
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "filters")))]
pub fn index(value: &Value, position: i64) -> Value {
    let list = match value {
        Value::List(list) => list,
        _ => return Value::None,
    };
    let i = if position < 0 {
        usize::try_from(position.unsigned_abs())
            .ok()
            .and_then(|back| list.len().checked_sub(back))
    } else {
        usize::try_from(position).ok()
    };
    i.and_then(|i| list.get(i)).cloned().unwrap_or_default()
}

/// Renders a value as compact JSON.
///
/// Drops are rendered as an object of their declared attributes.
///
/// ```
/// use drip::{filters::jsonify, value};
///
/// let listing = value! { name: "Listing A" };
/// assert_eq!(jsonify(&listing)?, r#"{"name":"Listing A"}"#);
/// # Ok::<(), drip::Error>(())
/// ```
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(all(feature = "filters", feature = "serde"))))]
pub fn jsonify(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(Error::serialize)
}
