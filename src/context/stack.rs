use indexmap::IndexMap;

use crate::Value;

/// A frame of local variables, such as the body of a loop or an `assign`.
///
/// Variables keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    vars: IndexMap<String, Value>,
}

impl Scope {
    /// Construct an empty scope.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variable, `Some(&Value::None)` if it was explicitly set to
    /// none and `None` if it is not set at all.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Set a variable, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.shift_remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over the variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Scope
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Identifies one scope for as long as it is on the stack.
///
/// Unlike a depth, an id keeps referring to the same scope when scopes are
/// pushed on top of it, and stops referring to anything once it is popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId {
    index: usize,
    serial: u64,
}

impl ScopeId {
    /// The position of the scope counted from the base scope, which is `0`.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
struct Entry {
    serial: u64,
    scope: Scope,
}

/// The stack of local scopes.
///
/// The stack is never empty, the base scope cannot be popped. Depths are
/// counted from the innermost scope, so depth `0` is the most recently pushed
/// scope and depth `len() - 1` is the base scope.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    // innermost last
    stack: Vec<Entry>,
    next_serial: u64,
}

impl Default for ScopeStack {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Construct a stack with an empty base scope.
    #[inline]
    pub fn new() -> Self {
        Self::with_base(Scope::new())
    }

    /// Construct a stack with the given base scope.
    #[inline]
    pub fn with_base(base: Scope) -> Self {
        Self {
            stack: vec![Entry {
                serial: 0,
                scope: base,
            }],
            next_serial: 1,
        }
    }

    pub fn push(&mut self, scope: Scope) {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.stack.push(Entry { serial, scope });
    }

    /// Pop the innermost scope.
    ///
    /// Returns `None` and leaves the stack untouched if only the base scope
    /// is left.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.stack.len() > 1 {
            self.stack.pop().map(|entry| entry.scope)
        } else {
            None
        }
    }

    /// The number of scopes on the stack, including the base scope.
    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Always `false`, the base scope always exists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns the scope at the given depth.
    pub fn get(&self, depth: usize) -> Option<&Scope> {
        let i = self.index(depth)?;
        self.stack.get(i).map(|entry| &entry.scope)
    }

    /// Returns the scope at the given depth.
    pub fn get_mut(&mut self, depth: usize) -> Option<&mut Scope> {
        let i = self.index(depth)?;
        self.stack.get_mut(i).map(|entry| &mut entry.scope)
    }

    /// Returns the id of the scope at the given depth.
    pub fn id(&self, depth: usize) -> Option<ScopeId> {
        let i = self.index(depth)?;
        self.id_at(i)
    }

    /// Returns the id of the base scope.
    pub fn base_id(&self) -> ScopeId {
        ScopeId {
            index: 0,
            serial: self.stack[0].serial,
        }
    }

    /// Returns the scope with the given id, or `None` if it has been popped.
    pub fn by_id(&self, id: ScopeId) -> Option<&Scope> {
        self.stack
            .get(id.index)
            .filter(|entry| entry.serial == id.serial)
            .map(|entry| &entry.scope)
    }

    /// Returns the scope with the given id, or `None` if it has been popped.
    pub fn by_id_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.stack
            .get_mut(id.index)
            .filter(|entry| entry.serial == id.serial)
            .map(|entry| &mut entry.scope)
    }

    pub fn innermost_mut(&mut self) -> &mut Scope {
        let i = self.stack.len() - 1;
        &mut self.stack[i].scope
    }

    pub fn outermost_mut(&mut self) -> &mut Scope {
        &mut self.stack[0].scope
    }

    fn index(&self, depth: usize) -> Option<usize> {
        self.stack.len().checked_sub(depth.checked_add(1)?)
    }

    fn id_at(&self, index: usize) -> Option<ScopeId> {
        let entry = self.stack.get(index)?;
        Some(ScopeId {
            index,
            serial: entry.serial,
        })
    }

    /// Finds the innermost scope that contains the variable, even if it is
    /// set to none, returning its id and the value.
    pub fn find(&self, name: &str) -> Option<(ScopeId, &Value)> {
        self.stack
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, entry)| {
                let value = entry.scope.get(name)?;
                Some((
                    ScopeId {
                        index,
                        serial: entry.serial,
                    },
                    value,
                ))
            })
    }
}
