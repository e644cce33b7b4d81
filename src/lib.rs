//! Variable resolution, drops and template sources for Liquid-style
//! templates.
//!
//! This crate is the support layer underneath a template renderer. It does
//! not parse or render templates itself, instead it answers the three
//! questions a renderer keeps asking:
//!
//! - What value does this variable currently have? See [`Context`].
//! - How does this host object present itself to a template? See
//!   [`drop`].
//! - What is the source of the template being included? See [`source`].
//!
//! # Getting started
//!
//! Your entry point is the [`Registry`][drop::Registry], which maps host
//! types to their drops. Generally, you only need to construct one registry
//! during the lifetime of a program and share it between renders.
//!
//! ```
//! use std::sync::Arc;
//!
//! let registry = Arc::new(drip::drop::Registry::new());
//! ```
//!
//! Each render then gets its own [`Context`], holding the scope stack and
//! environment chain for that render.
//!
//! ```
//! # use std::sync::Arc;
//! use drip::{Context, Environment, Value};
//!
//! # let registry = Arc::new(drip::drop::Registry::new());
//! let mut ctx = Context::new(registry);
//! ctx.push_environment(Environment::from_iter([("site", "Example")]));
//! ctx.set("title", "Hello");
//!
//! assert_eq!(ctx.find_variable("title")?, Value::from("Hello"));
//! assert_eq!(ctx.find_variable("site")?, Value::from("Example"));
//! assert_eq!(ctx.find_variable("missing")?, Value::None);
//! # Ok::<(), drip::Error>(())
//! ```
//!
//! # Examples
//!
//! ### Block scoped variables
//!
//! Variables set inside [`Context::stack`] shadow everything outside of it,
//! even when they are set to none.
//!
//! ```
//! use drip::{Context, Environment, Value};
//!
//! let mut ctx = Context::default();
//! ctx.push_environment(Environment::from_iter([("x", 1)]));
//!
//! ctx.stack(|ctx| {
//!     ctx.set("x", Value::None);
//!     assert_eq!(ctx.find_variable("x").unwrap(), Value::None);
//! });
//! assert_eq!(ctx.find_variable("x")?, Value::Integer(1));
//! # Ok::<(), drip::Error>(())
//! ```
//!
//! ### Lazy environment entries
//!
//! Expensive values can be computed on first use. The result replaces the
//! producer so it only ever runs once per render.
//!
//! ```
//! use drip::{Context, Environment, Value};
//!
//! let mut env = Environment::new();
//! env.insert_lazy("posts", || Value::from(["a", "b"]));
//!
//! let mut ctx = Context::default();
//! ctx.push_environment(env);
//! assert_eq!(ctx.find_variable("posts")?, Value::from(["a", "b"]));
//! # Ok::<(), drip::Error>(())
//! ```
//!
//! ### Include templates from a directory
//!
//! ```no_run
//! use std::sync::Arc;
//! use drip::source::LocalFileSystem;
//! use drip::Context;
//!
//! let ctx = Context::default().with_source(Arc::new(LocalFileSystem::new("templates")));
//!
//! // reads `templates/partials/_footer.liquid`
//! let text = ctx.read_template("partials/footer")?;
//! # Ok::<(), drip::Error>(())
//! ```

pub mod context;
pub mod drop;
mod error;
#[cfg(feature = "filters")]
#[cfg_attr(docsrs, doc(cfg(feature = "filters")))]
pub mod filters;
mod macros;
pub mod source;
pub mod value;

pub use crate::context::{Context, Environment, Scope};
pub use crate::error::{Error, ErrorKind, Result};
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::Value;
