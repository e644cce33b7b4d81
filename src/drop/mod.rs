//! Renderable projections of host values.
//!
//! A host value that should be visible to templates implements
//! [`Droppable`] and is wrapped in an [`Object`]. When a variable resolves to
//! an object the [`Registry`] finds the drop registered for the object's type
//! name and constructs it. The resulting [`DropValue`] only ever exposes the
//! attributes its drop declares.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use drip::drop::{Droppable, LiquidDrop, Registry};
//! use drip::value::{object, Object};
//! use drip::{Context, Value};
//!
//! struct User {
//!     name: String,
//!     password: String,
//! }
//!
//! impl Droppable for User {
//!     fn type_name(&self) -> &str {
//!         "User"
//!     }
//! }
//!
//! struct UserDrop(Object);
//!
//! impl LiquidDrop for UserDrop {
//!     fn attributes(&self) -> &[&'static str] {
//!         &["name"]
//!     }
//!
//!     fn attribute(&self, name: &str) -> Value {
//!         match (name, self.0.downcast_ref::<User>()) {
//!             ("name", Some(user)) => Value::from(user.name.as_str()),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let registry = Registry::builder()
//!     .drop_with("UserDrop", |obj| Box::new(UserDrop(obj)))
//!     .host("User")
//!     .build()?;
//!
//! let mut ctx = Context::new(Arc::new(registry));
//! ctx.set("user", object(User { name: "John".into(), password: "hunter2".into() }));
//!
//! let Value::Drop(user) = ctx.find_variable("user")? else { panic!() };
//! assert_eq!(user.get("name"), Value::from("John"));
//! assert_eq!(user.get("password"), Value::None);
//! # Ok::<(), drip::Error>(())
//! ```

mod collection;
mod registry;

use std::fmt;
use std::sync::Arc;

pub use crate::drop::collection::{CollectionDrop, ASSOCIATION_RELATION, COLLECTION_PROXY};
pub use crate::drop::registry::{Factory, Registry, RegistryBuilder};

use crate::context::ContextRef;
use crate::{Result, Value};

/// A host value that can be converted into a drop.
pub trait Droppable: std::any::Any + Send + Sync {
    /// The runtime type name used to find this value's drop.
    ///
    /// Unless overridden in the registry the drop is expected to be
    /// registered under this name followed by `Drop`.
    fn type_name(&self) -> &str;

    /// The elements of this value if it is a collection of records.
    fn members(&self) -> Option<Vec<Value>> {
        None
    }
}

/// The renderable projection of a host value.
pub trait LiquidDrop: Send + Sync {
    /// The attributes this drop exposes to templates.
    fn attributes(&self) -> &[&'static str];

    /// Returns the value of an attribute.
    ///
    /// This is only called for names returned by
    /// [`attributes`][LiquidDrop::attributes].
    fn attribute(&self, name: &str) -> Value;

    /// Receives a back-reference to the context that resolved this drop.
    ///
    /// Drops that do not need the context keep the default, which ignores
    /// it. An error fails the resolution that constructed the drop.
    fn bind_context(&mut self, _ctx: ContextRef) -> Result<()> {
        Ok(())
    }
}

/// A constructed drop, as handed to the renderer.
#[derive(Clone)]
pub struct DropValue {
    name: Arc<str>,
    inner: Arc<dyn LiquidDrop>,
}

impl DropValue {
    pub(crate) fn new(name: Arc<str>, inner: Box<dyn LiquidDrop>) -> Self {
        Self {
            name,
            inner: Arc::from(inner),
        }
    }

    /// The name the drop was registered under.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attributes this drop exposes.
    #[inline]
    pub fn attributes(&self) -> &[&'static str] {
        self.inner.attributes()
    }

    /// Returns the value of an attribute, or [`Value::None`] if the drop does
    /// not declare it.
    pub fn get(&self, attr: &str) -> Value {
        if self.inner.attributes().iter().any(|a| *a == attr) {
            self.inner.attribute(attr)
        } else {
            Value::None
        }
    }
}

impl PartialEq for DropValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.inner).cast::<()>() == Arc::as_ptr(&other.inner).cast::<()>()
    }
}

impl fmt::Debug for DropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DropValue").field(&self.name()).finish()
    }
}
