use std::fmt;

///
/// RelationCardinality
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationCardinality {
    One,
    Many,
}

///
/// RelationStorage
///
/// Where the related value's data physically lives.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationStorage {
    /// The related value has its own addressable row.
    OwnRow,
    /// The related value is persisted inside the owner's row.
    EmbeddedInOwner,
}

///
/// RelationSide
///
/// Which side of the association holds the stored reference.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RelationSide {
    /// The target's row references the owner.
    Principal,
    /// The owner's row references the target.
    Dependent,
}

///
/// RelationModel
///
/// Runtime relation descriptor for one navigation on an entity type.
///

pub struct RelationModel {
    pub name: &'static str,
    pub cardinality: RelationCardinality,
    pub storage: RelationStorage,
    pub side: RelationSide,
    /// Navigation on the target type pointing back at the owner, if declared.
    pub inverse: Option<&'static Self>,
}

impl RelationModel {
    #[must_use]
    pub const fn new(
        name: &'static str,
        cardinality: RelationCardinality,
        storage: RelationStorage,
        side: RelationSide,
        inverse: Option<&'static Self>,
    ) -> Self {
        Self {
            name,
            cardinality,
            storage,
            side,
            inverse,
        }
    }

    /// Reference navigation whose owner row stores the key of the target.
    #[must_use]
    pub const fn reference(name: &'static str, inverse: Option<&'static Self>) -> Self {
        Self::new(
            name,
            RelationCardinality::One,
            RelationStorage::OwnRow,
            RelationSide::Dependent,
            inverse,
        )
    }

    /// Collection navigation whose members store the key of the owner.
    #[must_use]
    pub const fn collection(name: &'static str, inverse: Option<&'static Self>) -> Self {
        Self::new(
            name,
            RelationCardinality::Many,
            RelationStorage::OwnRow,
            RelationSide::Principal,
            inverse,
        )
    }

    /// Single value persisted inside the owner's row.
    #[must_use]
    pub const fn embedded(name: &'static str) -> Self {
        Self::new(
            name,
            RelationCardinality::One,
            RelationStorage::EmbeddedInOwner,
            RelationSide::Principal,
            None,
        )
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.cardinality, RelationCardinality::Many)
    }

    #[must_use]
    pub const fn is_embedded_in_owner_storage(&self) -> bool {
        matches!(self.storage, RelationStorage::EmbeddedInOwner)
    }

    #[must_use]
    pub const fn is_on_dependent_side(&self) -> bool {
        matches!(self.side, RelationSide::Dependent)
    }

    /// Relation recorded on the target's side of a mirrored edge.
    #[must_use]
    pub const fn inverse_or_self(&'static self) -> &'static Self {
        match self.inverse {
            Some(inverse) => inverse,
            None => self,
        }
    }

    /// True when the owner cannot be written before the target.
    ///
    /// Embedded values flip the usual direction: the owner row is incomplete
    /// until the embedded value is known.
    #[must_use]
    pub const fn owner_waits_on_target(&self) -> bool {
        self.is_on_dependent_side() || self.is_embedded_in_owner_storage()
    }
}

// Inverses point at each other, so only the inverse name is printed.
impl fmt::Debug for RelationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationModel")
            .field("name", &self.name)
            .field("cardinality", &self.cardinality)
            .field("storage", &self.storage)
            .field("side", &self.side)
            .field("inverse", &self.inverse.map(|inverse| inverse.name))
            .finish()
    }
}
