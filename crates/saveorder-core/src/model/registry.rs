use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::entity::EntityModel,
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// ModelRegistryError
///

#[derive(Debug, ThisError)]
pub enum ModelRegistryError {
    #[error("entity model '{0}' not found")]
    ModelNotFound(String),

    #[error("entity model '{0}' already registered")]
    ModelAlreadyRegistered(String),

    #[error("entity model '{path}' declares relation '{relation}' more than once")]
    DuplicateRelation {
        path: &'static str,
        relation: &'static str,
    },
}

impl ModelRegistryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::ModelNotFound(_) => ErrorClass::NotFound,
            Self::ModelAlreadyRegistered(_) | Self::DuplicateRelation { .. } => {
                ErrorClass::InvariantViolation
            }
        }
    }
}

impl From<ModelRegistryError> for InternalError {
    fn from(err: ModelRegistryError) -> Self {
        Self::new(err.class(), ErrorOrigin::Model, err.to_string())
    }
}

///
/// EntityModelRegistry
///
/// Startup-populated map from entity path to its static model.
/// Metadata providers use it to answer type lookups without process-wide state.
///

#[derive(Debug, Default)]
pub struct EntityModelRegistry {
    models: HashMap<&'static str, &'static EntityModel>,
}

impl EntityModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one model; paths are unique and relation names are unique per model.
    pub fn register(&mut self, model: &'static EntityModel) -> Result<(), InternalError> {
        if self.models.contains_key(model.path) {
            return Err(ModelRegistryError::ModelAlreadyRegistered(model.path.to_string()).into());
        }

        for (i, relation) in model.relations.iter().enumerate() {
            if model.relations[..i]
                .iter()
                .any(|earlier| earlier.name == relation.name)
            {
                return Err(ModelRegistryError::DuplicateRelation {
                    path: model.path,
                    relation: relation.name,
                }
                .into());
            }
        }

        self.models.insert(model.path, model);

        Ok(())
    }

    /// Build a registry from a fixed model list.
    pub fn from_models(
        models: impl IntoIterator<Item = &'static EntityModel>,
    ) -> Result<Self, InternalError> {
        let mut registry = Self::new();
        for model in models {
            registry.register(model)?;
        }

        Ok(registry)
    }

    #[must_use]
    pub fn try_get(&self, path: &str) -> Option<&'static EntityModel> {
        self.models.get(path).copied()
    }

    pub fn get(&self, path: &str) -> Result<&'static EntityModel, InternalError> {
        self.try_get(path)
            .ok_or_else(|| ModelRegistryError::ModelNotFound(path.to_string()).into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

///
/// TESTS
///
