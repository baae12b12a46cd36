//! Name-indexed table of declared model types.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::DeclarationError;
use crate::model::ModelType;

/// Model types by name.
///
/// Filled once during start-up and read afterwards; share it behind an `Arc`
/// once registration is complete.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: FxHashMap<String, Arc<ModelType>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model type. Names must be unique.
    pub fn register(&mut self, model: Arc<ModelType>) -> Result<(), DeclarationError> {
        if self.models.contains_key(model.name()) {
            return Err(DeclarationError::DuplicateModel {
                name: model.name().to_string(),
            });
        }
        self.models.insert(model.name().to_string(), model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModelType>> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterates over registered models in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModelType>> {
        self.models.values()
    }
}
