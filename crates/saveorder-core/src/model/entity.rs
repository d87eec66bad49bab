use crate::model::relation::RelationModel;

///
/// EntityModel
/// Minimal runtime model for one persisted entity type.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (for dispatch and diagnostics).
    pub path: &'static str,
    /// Stable external name used in diagnostics and batching.
    pub entity_name: &'static str,
    /// Ordered relation list; traversal follows this order.
    pub relations: &'static [&'static RelationModel],
}

impl EntityModel {
    #[must_use]
    pub const fn new(
        path: &'static str,
        entity_name: &'static str,
        relations: &'static [&'static RelationModel],
    ) -> Self {
        Self {
            path,
            entity_name,
            relations,
        }
    }
}
