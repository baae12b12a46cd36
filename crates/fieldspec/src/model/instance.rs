//! Model instances.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ShapeError;
use crate::model::{ModelType, Value};
use crate::validate::{validate_instance, Validation};

/// A record holding attribute values for one [`ModelType`].
///
/// Attributes keep the order in which they were first set; that order is the
/// key order of the serialized JSON object.
#[derive(Clone)]
pub struct Instance {
    model: Arc<ModelType>,
    attributes: IndexMap<String, Value>,
}

impl Instance {
    /// Creates an instance with no attributes set.
    pub fn new(model: &Arc<ModelType>) -> Self {
        Self {
            model: Arc::clone(model),
            attributes: IndexMap::new(),
        }
    }

    pub fn model_type(&self) -> &Arc<ModelType> {
        &self.model
    }

    /// Assigns an attribute.
    ///
    /// Fails if the model is strict and does not declare `name`, or if the
    /// value contains a list whose length disagrees with a fixed-arity list
    /// spec. Re-assigning keeps the attribute's original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<(), ShapeError> {
        let name = name.into();
        let value = value.into();
        match self.model.field(&name) {
            Some(spec) => spec.check_shape(&name, &value)?,
            None if !self.model.allows_unknown_attributes() => {
                return Err(ShapeError::UnknownAttribute {
                    model: self.model.name().to_string(),
                    attribute: name,
                });
            }
            None => {}
        }
        self.attributes.insert(name, value);
        Ok(())
    }

    /// Builder form of [`Instance::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self, ShapeError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Stores an attribute without any policy or shape check.
    ///
    /// Used by the deserializer, which leaves rejection to validation.
    pub(crate) fn insert_unchecked(&mut self, name: String, value: Value) {
        self.attributes.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Removes an attribute, preserving the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterates over attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Checks fixed-arity lists across the whole instance graph, naming
    /// fields `{prefix}{field}`.
    pub(crate) fn check_shape(&self, prefix: &str) -> Result<(), ShapeError> {
        for (name, value) in &self.attributes {
            if let Some(spec) = self.model.field(name) {
                spec.check_shape(&format!("{prefix}{name}"), value)?;
            }
        }
        Ok(())
    }

    /// Validates this instance against its model type.
    pub fn validate(&self) -> Validation {
        validate_instance(self)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.model, &other.model) && self.attributes == other.attributes
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("model", &self.model.name())
            .field("attributes", &self.attributes)
            .finish()
    }
}
