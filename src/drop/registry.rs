use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::drop::collection::{CollectionDrop, ASSOCIATION_RELATION, COLLECTION_PROXY};
use crate::drop::LiquidDrop;
use crate::value::Object;
use crate::{Error, Result};

/// The suffix appended to a host type name to derive its drop name.
const DROP_SUFFIX: &str = "Drop";

/// A drop constructor.
pub type Factory = Arc<dyn Fn(Object) -> Box<dyn LiquidDrop> + Send + Sync>;

/// Maps host type names to the drops that project them.
///
/// The registry is meant to be built once at startup and then shared between
/// renders using an [`Arc`]. The mapping from a host type name to its drop is
/// derived the first time a type name is seen and cached from then on, keyed by
/// the name [`Droppable::type_name`][crate::drop::Droppable::type_name] reports.
pub struct Registry {
    drops: HashMap<Arc<str>, Factory>,
    overrides: HashMap<String, Arc<str>>,
    cache: RwLock<HashMap<String, (Arc<str>, Factory)>>,
}

/// Builds a [`Registry`], checking that every declared host type has a drop.
#[must_use = "call `.build()` to construct the registry"]
pub struct RegistryBuilder {
    registry: Registry,
    hosts: BTreeSet<String>,
}

impl Default for Registry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Construct a registry that only knows the builtin collection drop.
    pub fn new() -> Self {
        let mut registry = Self {
            drops: HashMap::new(),
            overrides: HashMap::new(),
            cache: RwLock::new(HashMap::new()),
        };
        registry.insert_drop(CollectionDrop::NAME, Arc::new(CollectionDrop::factory));
        for proxy in [COLLECTION_PROXY, ASSOCIATION_RELATION] {
            registry
                .overrides
                .insert(proxy.to_owned(), Arc::from(CollectionDrop::NAME));
        }
        registry
    }

    /// Construct a builder.
    #[inline]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            registry: Self::new(),
            hosts: BTreeSet::new(),
        }
    }

    fn insert_drop(&mut self, name: &str, factory: Factory) {
        self.drops.insert(Arc::from(name), factory);
    }

    /// Returns the name of the drop used for the given host type name.
    ///
    /// Explicit overrides are checked first, otherwise the drop name is the
    /// type name followed by `Drop`. Fails with a configuration error if no
    /// such drop is registered.
    pub fn drop_name_for(&self, type_name: &str) -> Result<&str> {
        let (name, _) = self.derive(type_name)?;
        Ok(name)
    }

    fn derive(&self, type_name: &str) -> Result<(&str, &Factory)> {
        let drop_name = match self.overrides.get(type_name) {
            Some(name) => name.to_string(),
            None => format!("{type_name}{DROP_SUFFIX}"),
        };
        match self.drops.get_key_value(drop_name.as_str()) {
            Some((name, factory)) => Ok((&**name, factory)),
            None => Err(Error::config(format!(
                "no drop registered for host type `{type_name}`, expected `{drop_name}`"
            ))),
        }
    }

    /// Returns the drop name and factory for an object, deriving and caching
    /// the mapping on first use.
    pub fn factory_for(&self, object: &Object) -> Result<(Arc<str>, Factory)> {
        let type_name = object.type_name();
        if let Some(found) = self.cache.read().get(type_name) {
            return Ok(found.clone());
        }

        // Derivation is deterministic so if another thread gets here first
        // both results are the same and either can be kept.
        let (name, factory) = self.derive(type_name)?;
        debug!(type_name, drop = name, "derived drop conversion");
        let found = (Arc::from(name), factory.clone());
        let mut cache = self.cache.write();
        Ok(cache
            .entry(type_name.to_owned())
            .or_insert(found)
            .clone())
    }

    /// Construct the drop for an object.
    ///
    /// The drop is not yet bound to a context.
    pub fn convert(&self, object: Object) -> Result<(Arc<str>, Box<dyn LiquidDrop>)> {
        let (name, factory) = self.factory_for(&object)?;
        Ok((name, factory(object)))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("drops", &self.drops.keys())
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl RegistryBuilder {
    /// Register a drop type under the given name.
    pub fn drop<D>(self, name: &str) -> Self
    where
        D: LiquidDrop + From<Object> + 'static,
    {
        self.drop_with(name, |object| Box::new(D::from(object)))
    }

    /// Register a drop under the given name using a constructor function.
    pub fn drop_with<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(Object) -> Box<dyn LiquidDrop> + Send + Sync + 'static,
    {
        self.registry.insert_drop(name, Arc::new(f));
        self
    }

    /// Map a host type name directly to a drop name, bypassing the naming
    /// convention.
    pub fn override_type(mut self, type_name: &str, drop_name: &str) -> Self {
        self.registry
            .overrides
            .insert(type_name.to_owned(), Arc::from(drop_name));
        self.hosts.insert(type_name.to_owned());
        self
    }

    /// Declare a host type that will be rendered.
    ///
    /// [`build`][RegistryBuilder::build] fails if it has no drop.
    pub fn host(mut self, type_name: &str) -> Self {
        self.hosts.insert(type_name.to_owned());
        self
    }

    /// Construct the registry, checking every declared host type.
    pub fn build(self) -> Result<Registry> {
        let Self { registry, hosts } = self;
        for type_name in &hosts {
            registry.derive(type_name)?;
        }
        Ok(registry)
    }
}
