use crate::context::ContextRef;
use crate::drop::LiquidDrop;
use crate::value::Object;
use crate::{Result, Value};

/// Type name of a lazily loaded relational collection.
pub const COLLECTION_PROXY: &str = "CollectionProxy";

/// Type name of a filtered relational collection.
pub const ASSOCIATION_RELATION: &str = "AssociationRelation";

/// The drop shared by every host collection of records.
///
/// Both [`COLLECTION_PROXY`] and [`ASSOCIATION_RELATION`] objects are
/// projected through this drop instead of deriving a drop per type. The
/// elements come from [`Droppable::members`][crate::drop::Droppable::members].
pub struct CollectionDrop {
    object: Object,
    members: Option<Vec<Value>>,
}

impl CollectionDrop {
    /// The name this drop is registered under.
    pub const NAME: &'static str = "CollectionDrop";

    const ATTRIBUTES: &'static [&'static str] = &["size", "first", "last", "empty", "any", "to_a"];

    pub(crate) fn factory(object: Object) -> Box<dyn LiquidDrop> {
        Box::new(Self::from(object))
    }

    /// The converted elements once bound, the raw elements before that.
    fn members(&self) -> Vec<Value> {
        match &self.members {
            Some(members) => members.clone(),
            None => self.object.members().unwrap_or_default(),
        }
    }
}

impl From<Object> for CollectionDrop {
    fn from(object: Object) -> Self {
        Self {
            object,
            members: None,
        }
    }
}

impl LiquidDrop for CollectionDrop {
    fn attributes(&self) -> &[&'static str] {
        Self::ATTRIBUTES
    }

    fn attribute(&self, name: &str) -> Value {
        let members = self.members();
        match name {
            "size" => Value::from(members.len()),
            "empty" => Value::Bool(members.is_empty()),
            "any" => Value::Bool(!members.is_empty()),
            "first" => members.into_iter().next().unwrap_or_default(),
            "last" => members.into_iter().last().unwrap_or_default(),
            "to_a" => Value::List(members),
            _ => Value::None,
        }
    }

    /// Converts every element through the context, so that an element
    /// without a drop fails the resolution of the collection itself.
    fn bind_context(&mut self, ctx: ContextRef) -> Result<()> {
        let members = self
            .object
            .members()
            .unwrap_or_default()
            .into_iter()
            .map(|member| ctx.to_liquid(member))
            .collect::<Result<_>>()?;
        self.members = Some(members);
        Ok(())
    }
}
