//! Defines the [`Value`] enum, representing any valid renderable data.

mod from;
#[cfg(feature = "serde")]
mod ser;

use std::any::Any;
pub use std::collections::btree_map;
pub use std::collections::BTreeMap as Map;
use std::fmt;
use std::mem;
use std::sync::Arc;
pub use std::vec::Vec as List;

pub use crate::value::from::object;
#[cfg(feature = "serde")]
pub use crate::value::ser::to_value;

use crate::drop::{DropValue, Droppable};

/// Data to be rendered represented as a recursive enum.
///
/// Scopes and environments hold raw values, which may contain host
/// [`Object`]s. Resolving a variable converts a top level object into a
/// [`Value::Drop`], everything else is passed through untouched.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
    Object(Object),
    Drop(DropValue),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(s), Self::Bool(o)) => s == o,
            (Self::Integer(s), Self::Integer(o)) => s == o,
            (Self::Float(s), Self::Float(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::List(s), Self::List(o)) => s == o,
            (Self::Map(s), Self::Map(o)) => s == o,
            (Self::Object(s), Self::Object(o)) => s == o,
            (Self::Drop(s), Self::Drop(o)) => s == o,
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Returns `true` if this is [`Value::None`].
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub(crate) fn human(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Drop(_) => "drop",
        }
    }
}

/// A shared host value that is converted into a drop when resolved.
///
/// The same allocation is exposed both as a [`Droppable`] (for the registry
/// to find its drop) and as [`Any`] (for drops to get at the concrete type).
#[derive(Clone)]
pub struct Object {
    host: Arc<dyn Droppable>,
    any: Arc<dyn Any + Send + Sync>,
}

impl Object {
    /// Wrap a host value.
    pub fn new<T>(value: T) -> Self
    where
        T: Droppable,
    {
        let value = Arc::new(value);
        Self {
            host: value.clone(),
            any: value,
        }
    }

    /// The name the conversion registry uses to find this object's drop.
    #[inline]
    pub fn type_name(&self) -> &str {
        self.host.type_name()
    }

    /// The elements of this object if it is a collection.
    #[inline]
    pub fn members(&self) -> Option<Vec<Value>> {
        self.host.members()
    }

    /// Returns a reference to the host value if it is of type `T`.
    #[inline]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Droppable,
    {
        self.any.downcast_ref()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.any).cast::<()>() == Arc::as_ptr(&other.any).cast::<()>()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.type_name()).finish()
    }
}
