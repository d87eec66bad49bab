use crate::model::{entity::EntityModel, relation::RelationModel};
use std::{fmt, rc::Rc, sync::Arc};

///
/// EntityId
///
/// Object identity of one entity handle for the duration of a resolve call.
/// Two handles to the same allocation share an id; equal values in separate
/// allocations do not.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityId(usize);

impl EntityId {
    #[must_use]
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>().addr())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

///
/// EntityHandle
///
/// Cheap, clonable reference to a caller-owned entity.
/// The resolver never mutates through a handle.
///

pub trait EntityHandle: Clone {
    fn identity(&self) -> EntityId;
}

impl<T: ?Sized> EntityHandle for Rc<T> {
    fn identity(&self) -> EntityId {
        EntityId::from_ptr(Rc::as_ptr(self))
    }
}

impl<T: ?Sized> EntityHandle for Arc<T> {
    fn identity(&self) -> EntityId {
        EntityId::from_ptr(Arc::as_ptr(self))
    }
}

///
/// MetadataProvider
///
/// Read-only schema and navigation access consumed by the resolver.
/// Implementations decide how runtime types map to models (generated
/// descriptors, a startup registry, ...).
///

pub trait MetadataProvider {
    type Entity: EntityHandle;

    /// Resolve the runtime type of `entity`; `None` means "not a persisted type".
    fn resolve_type(&self, entity: &Self::Entity) -> Option<&'static EntityModel>;

    /// Relations declared on `model`, in traversal order.
    fn relations_of(&self, model: &'static EntityModel) -> &'static [&'static RelationModel] {
        model.relations
    }

    /// Current members of a collection navigation; `None` when unset.
    fn collection_value(
        &self,
        entity: &Self::Entity,
        relation: &'static RelationModel,
    ) -> Option<Vec<Self::Entity>>;

    /// Current target of a reference navigation; `None` when unset.
    fn reference_value(
        &self,
        entity: &Self::Entity,
        relation: &'static RelationModel,
    ) -> Option<Self::Entity>;
}
