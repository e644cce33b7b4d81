use serde::ser::{Error as _, Serialize, SerializeMap};

use crate::value::Map;
use crate::{Error, Result, Value};

/// Convert a `T` to a `Value`.
///
/// Any plain data that implements [`Serialize`] can be placed in a scope or
/// environment this way. Host objects that need a restricted attribute
/// surface should be wrapped with [`object`][crate::value::object] instead.
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub fn to_value<T>(value: T) -> Result<Value>
where
    T: Serialize,
{
    let json = serde_json::to_value(value).map_err(Error::serialize)?;
    from_json(json)
}

fn from_json(json: serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    let value = match json {
        Json::Null => Value::None,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_u64() {
                return Err(Error::serialize(
                    "out of range integral type conversion attempted",
                ));
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => Value::String(s),
        Json::Array(list) => Value::List(
            list.into_iter()
                .map(from_json)
                .collect::<Result<_>>()?,
        ),
        Json::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| Ok((k, from_json(v)?)))
                .collect::<Result<Map<_, _>>>()?,
        ),
    };
    Ok(value)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(string) => serializer.serialize_str(string),
            Value::List(list) => list.serialize(serializer),
            Value::Map(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            // Collections serialize as their members, anything else has no
            // declared attribute surface and must go through a drop first.
            Value::Object(object) => match object.members() {
                Some(members) => members.serialize(serializer),
                None => Err(S::Error::custom(format!(
                    "cannot serialize host object `{}`, resolve it to a drop first",
                    object.type_name()
                ))),
            },
            Value::Drop(drop) => {
                let attrs = drop.attributes();
                let mut m = serializer.serialize_map(Some(attrs.len()))?;
                for attr in attrs {
                    m.serialize_entry(attr, &drop.get(attr))?;
                }
                m.end()
            }
        }
    }
}
