use std::fmt;
use std::mem;

use indexmap::IndexMap;
use tracing::trace;

use crate::Value;

/// A zero argument computation stored in an environment.
pub type LazyFn = dyn FnOnce() -> Value + Send;

enum Slot {
    Value(Value),
    Lazy(Box<LazyFn>),
    // The producer panicked, the variable is unset.
    Taken,
}

/// An ambient source of variables, such as request or global data.
///
/// Entries are either values or lazy producers. A producer is evaluated the
/// first time it is looked up and its result replaces it.
#[derive(Default)]
pub struct Environment {
    slots: IndexMap<String, Slot>,
}

impl Environment {
    /// Construct an empty environment.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.slots.insert(name.into(), Slot::Value(value.into()));
    }

    /// Set a variable that is computed the first time it is looked up.
    pub fn insert_lazy<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnOnce() -> Value + Send + 'static,
    {
        self.slots.insert(name.into(), Slot::Lazy(Box::new(f)));
    }

    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Returns `true` if the variable is present and set to none.
    ///
    /// Lazy entries that have not been evaluated yet are not none.
    pub fn is_explicit_none(&self, name: &str) -> bool {
        matches!(self.slots.get(name), Some(Slot::Value(Value::None)))
    }

    /// Returns the variable if it is present and already evaluated.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.slots.get(name)? {
            Slot::Value(value) => Some(value),
            Slot::Lazy(_) | Slot::Taken => None,
        }
    }

    /// Returns `true` if the variable is a producer that has not been
    /// evaluated yet.
    pub fn is_pending(&self, name: &str) -> bool {
        matches!(self.slots.get(name), Some(Slot::Lazy(_)))
    }

    /// Looks up a variable, evaluating and memoizing it if it is lazy.
    ///
    /// Absent variables are [`Value::None`]. If a producer panics the
    /// variable is left unset rather than set to none.
    pub fn lookup_and_evaluate(&mut self, name: &str) -> Value {
        let slot = match self.slots.get_mut(name) {
            Some(slot) => slot,
            None => return Value::None,
        };
        if let Slot::Value(value) = slot {
            return value.clone();
        }
        let f = match mem::replace(slot, Slot::Taken) {
            Slot::Lazy(f) => f,
            other => {
                *slot = other;
                return Value::None;
            }
        };
        trace!(name, "evaluating lazy variable");
        let value = f();
        *slot = Slot::Value(value.clone());
        value
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            slots: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Slot::Value(v.into())))
                .collect(),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for (k, slot) in &self.slots {
            match slot {
                Slot::Value(v) => m.entry(k, v),
                Slot::Lazy(_) => m.entry(k, &format_args!("<lazy>")),
                Slot::Taken => m.entry(k, &format_args!("<panicked>")),
            };
        }
        m.finish()
    }
}

/// The chain of environments consulted after the scope stack, in order.
#[derive(Debug, Default)]
pub struct Environments {
    chain: Vec<Environment>,
}

impl Environments {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an environment to the end of the chain.
    pub fn push(&mut self, env: Environment) {
        self.chain.push(env);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Environment> {
        self.chain.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Environment> {
        self.chain.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.chain.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Environment> {
        self.chain.iter_mut()
    }
}

impl FromIterator<Environment> for Environments {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Environment>,
    {
        Self {
            chain: iter.into_iter().collect(),
        }
    }
}
