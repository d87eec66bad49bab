//! Core runtime for SaveOrder: entity models, the metadata interface, the
//! write-order resolver, and observability hooks.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod traits;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary needed to describe models,
/// implement a metadata provider, and run a resolve.
///

pub mod prelude {
    pub use crate::{
        db::{ResolveConfig, ResolveSession, WritePlan},
        model::{
            entity::EntityModel,
            relation::{RelationCardinality, RelationModel, RelationSide, RelationStorage},
        },
        traits::{EntityHandle, EntityId, MetadataProvider},
    };
}
