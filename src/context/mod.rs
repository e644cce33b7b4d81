//! The execution context of a single render.
//!
//! A [`Context`] owns the [`ScopeStack`] and [`Environments`] of one render and
//! answers the question "what value does this name currently have". It also
//! carries the registers, a side channel used to pass render-wide settings
//! such as the default template directory, and the template source used for
//! includes.

mod env;
mod stack;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

pub use crate::context::env::{Environment, Environments, LazyFn};
pub use crate::context::stack::{Scope, ScopeId, ScopeStack};

use crate::drop::{DropValue, Registry};
use crate::source::{BlankFileSystem, TemplateSource};
use crate::value::Map;
use crate::{Result, Value};

/// The frame a variable was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// A scope on the stack.
    Scope(ScopeId),
    /// An environment, at the given index in the chain.
    Environment(usize),
}

/// The outcome of [`Context::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The converted value.
    pub value: Value,
    /// The frame that is authoritative for the name, which
    /// [`Context::write_back`] can store into.
    pub frame: Frame,
}

/// Render-wide settings shared with drops and template sources.
#[derive(Clone, Default)]
pub struct Registers {
    values: Map<String, Value>,
    default_dir: Option<String>,
    template_source: Option<Arc<dyn TemplateSource>>,
}

impl Registers {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an arbitrary register.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set an arbitrary register.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// The directory that template names without a `/` are resolved in.
    #[inline]
    pub fn default_dir(&self) -> Option<&str> {
        self.default_dir.as_deref()
    }

    pub fn set_default_dir(&mut self, dir: impl Into<String>) {
        self.default_dir = Some(dir.into());
    }

    /// A template source that takes precedence over the context's own.
    #[inline]
    pub fn template_source(&self) -> Option<&Arc<dyn TemplateSource>> {
        self.template_source.as_ref()
    }

    pub fn set_template_source(&mut self, source: Arc<dyn TemplateSource>) {
        self.template_source = Some(source);
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registers")
            .field("values", &self.values)
            .field("default_dir", &self.default_dir)
            .field("template_source", &self.template_source.is_some())
            .finish()
    }
}

#[derive(Debug)]
struct Shared {
    registry: Arc<Registry>,
    registers: RwLock<Registers>,
}

/// A non-owning reference to the [`Context`] that resolved a drop.
///
/// All methods degrade gracefully once the render is over and the context has
/// been dropped.
#[derive(Debug, Clone)]
pub struct ContextRef(Weak<Shared>);

impl ContextRef {
    /// Returns `true` if the context is still alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Converts a value the same way the context converts resolved variables.
    ///
    /// Returns the value unchanged if the context is gone.
    pub fn to_liquid(&self, value: Value) -> Result<Value> {
        match self.0.upgrade() {
            Some(shared) => to_liquid(&shared, value),
            None => Ok(value),
        }
    }

    /// Returns a copy of an arbitrary register.
    pub fn register(&self, key: &str) -> Option<Value> {
        let shared = self.0.upgrade()?;
        let registers = shared.registers.read();
        registers.get(key).cloned()
    }

    /// Returns a copy of the default template directory.
    pub fn default_dir(&self) -> Option<String> {
        let shared = self.0.upgrade()?;
        let registers = shared.registers.read();
        registers.default_dir().map(String::from)
    }
}

fn to_liquid(shared: &Arc<Shared>, value: Value) -> Result<Value> {
    match value {
        Value::Object(object) => {
            let (name, mut drop) = shared.registry.convert(object)?;
            drop.bind_context(ContextRef(Arc::downgrade(shared)))?;
            Ok(Value::Drop(DropValue::new(name, drop)))
        }
        value => Ok(value),
    }
}

/// The variables, registers and template source of a single render.
pub struct Context {
    scopes: ScopeStack,
    environments: Environments,
    shared: Arc<Shared>,
    source: Arc<dyn TemplateSource>,
}

impl Default for Context {
    #[inline]
    fn default() -> Self {
        Self::new(Arc::new(Registry::new()))
    }
}

impl Context {
    /// Construct a context with an empty scope stack, no environments and a
    /// template source that does not allow includes.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            scopes: ScopeStack::new(),
            environments: Environments::new(),
            shared: Arc::new(Shared {
                registry,
                registers: RwLock::new(Registers::new()),
            }),
            source: Arc::new(BlankFileSystem),
        }
    }

    /// Set the template source used for includes.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn TemplateSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the environment chain.
    #[must_use]
    pub fn with_environments(mut self, environments: Environments) -> Self {
        self.environments = environments;
        self
    }

    /// Replace the scope stack.
    #[must_use]
    pub fn with_scopes(mut self, scopes: ScopeStack) -> Self {
        self.scopes = scopes;
        self
    }

    /// Append an environment to the end of the chain.
    pub fn push_environment(&mut self, env: Environment) {
        self.environments.push(env);
    }

    #[inline]
    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    #[inline]
    pub fn environments(&self) -> &Environments {
        &self.environments
    }

    #[inline]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.shared.registry
    }

    /// A non-owning reference to this context.
    pub fn context_ref(&self) -> ContextRef {
        ContextRef(Arc::downgrade(&self.shared))
    }

    /// Returns a copy of an arbitrary register.
    pub fn register(&self, key: &str) -> Option<Value> {
        self.shared.registers.read().get(key).cloned()
    }

    /// Runs `f` with mutable access to the registers.
    ///
    /// `f` edits a copy which replaces the registers when it returns, so
    /// drops bound to this context can still read the registers from inside
    /// `f`.
    pub fn with_registers<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Registers) -> R,
    {
        let mut registers = self.shared.registers.read().clone();
        let result = f(&mut registers);
        *self.shared.registers.write() = registers;
        result
    }

    /// Set a variable in the innermost scope.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.scopes.innermost_mut().insert(name, value);
    }

    /// Runs `f` with a new empty scope pushed onto the stack.
    pub fn stack<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.stack_with(Scope::new(), f)
    }

    /// Runs `f` with the given scope pushed onto the stack.
    ///
    /// The scope is popped when `f` returns, whatever it returns, and when
    /// it panics.
    pub fn stack_with<F, R>(&mut self, scope: Scope, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let depth = self.scopes.len();
        self.scopes.push(scope);
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        while self.scopes.len() > depth {
            if self.scopes.pop().is_none() {
                break;
            }
        }
        match result {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Resolves a variable and returns its converted value.
    ///
    /// An unknown variable is [`Value::None`]. The only possible error is a
    /// configuration error from the [`Registry`] when the value is a host
    /// object without a drop.
    pub fn find_variable(&mut self, name: &str) -> Result<Value> {
        Ok(self.resolve(name)?.value)
    }

    /// Resolves a variable, returning its converted value and the frame that
    /// is authoritative for it.
    ///
    /// 1. The innermost scope that contains the name wins, even if the value
    ///    is none. Environments are not consulted at all.
    /// 2. Otherwise if any environment explicitly sets the name to none the
    ///    value is none and no lazy producer is evaluated.
    /// 3. Otherwise the first environment that yields a value other than none
    ///    wins, evaluating lazy producers along the way.
    /// 4. Otherwise the value is none and the last environment, or the base
    ///    scope if there are no environments, is authoritative.
    pub fn resolve(&mut self, name: &str) -> Result<Resolution> {
        let (frame, raw) = self.lookup(name);
        trace!(name, ?frame, kind = raw.human(), "resolved variable");
        let value = to_liquid(&self.shared, raw)?;
        Ok(Resolution { value, frame })
    }

    fn lookup(&mut self, name: &str) -> (Frame, Value) {
        if let Some((id, value)) = self.scopes.find(name) {
            return (Frame::Scope(id), value.clone());
        }

        if self.environments.iter().any(|env| env.is_explicit_none(name)) {
            return (self.fallback_frame(), Value::None);
        }

        for (i, env) in self.environments.iter_mut().enumerate() {
            let value = env.lookup_and_evaluate(name);
            if !value.is_none() {
                return (Frame::Environment(i), value);
            }
        }

        (self.fallback_frame(), Value::None)
    }

    fn fallback_frame(&self) -> Frame {
        match self.environments.len() {
            0 => Frame::Scope(self.scopes.base_id()),
            n => Frame::Environment(n - 1),
        }
    }

    /// Stores a variable in the given frame.
    ///
    /// Returns `false` if the frame no longer exists, for example because the
    /// scope it refers to has been popped. Scopes pushed since the frame was
    /// resolved do not change where the value is stored.
    pub fn write_back(&mut self, frame: Frame, name: &str, value: impl Into<Value>) -> bool {
        match frame {
            Frame::Scope(id) => match self.scopes.by_id_mut(id) {
                Some(scope) => {
                    scope.insert(name, value);
                    true
                }
                None => false,
            },
            Frame::Environment(i) => match self.environments.get_mut(i) {
                Some(env) => {
                    env.insert(name, value);
                    true
                }
                None => false,
            },
        }
    }

    /// Converts a value the same way resolved variables are converted.
    ///
    /// The renderer uses this for values it reaches by indexing into lists and
    /// maps.
    pub fn to_liquid(&self, value: Value) -> Result<Value> {
        to_liquid(&self.shared, value)
    }

    /// Reads the source of an included template.
    ///
    /// A template source set in the registers takes precedence over the one
    /// this context was constructed with.
    pub fn read_template(&self, name: &str) -> Result<String> {
        let registers = self.shared.registers.read();
        let source = registers.template_source().unwrap_or(&self.source);
        source.read_template_file(name, &registers)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("scopes", &self.scopes)
            .field("environments", &self.environments)
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}
