//! Model type declarations.
//!
//! A model type is a named, ordered table of field specs plus a policy for
//! attributes outside that table. It is produced once by
//! [`ModelTypeBuilder::build`] and shared immutably through an `Arc`.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::DeclarationError;
use crate::model::{FieldSpec, Instance};

/// An immutable model declaration.
#[derive(Debug)]
pub struct ModelType {
    name: String,
    fields: Vec<(String, FieldSpec)>,
    index: FxHashMap<String, usize>,
    allow_unknown: bool,
    parent: Option<Arc<ModelType>>,
}

impl ModelType {
    /// Starts a declaration for a model named `name`.
    pub fn builder(name: impl Into<String>) -> ModelTypeBuilder {
        ModelTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Looks up the spec for a field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i].1)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Whether instances may carry attributes outside the field table.
    pub fn allows_unknown_attributes(&self) -> bool {
        self.allow_unknown
    }

    /// The model this one extends, if any.
    pub fn parent(&self) -> Option<&Arc<ModelType>> {
        self.parent.as_ref()
    }

    /// Creates an empty instance of this model.
    pub fn instance(self: &Arc<Self>) -> Instance {
        Instance::new(self)
    }
}

/// Builder for declaring a [`ModelType`].
#[derive(Debug, Clone)]
pub struct ModelTypeBuilder {
    name: String,
    fields: Vec<(String, FieldSpec)>,
    allow_unknown: Option<bool>,
    parent: Option<Arc<ModelType>>,
}

impl ModelTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            allow_unknown: None,
            parent: None,
        }
    }

    /// Adds a field. Fields keep the order in which they are added.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    /// Inherits every field of `parent`, ahead of this model's own fields.
    ///
    /// A field redeclared here replaces the parent's spec at the parent's
    /// position. The unknown-attribute policy is inherited unless set.
    pub fn extends(mut self, parent: &Arc<ModelType>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Sets the unknown-attribute policy. Strict (`false`) by default.
    pub fn allow_unknown_attributes(mut self, allow: bool) -> Self {
        self.allow_unknown = Some(allow);
        self
    }

    /// Finishes the declaration.
    pub fn build(self) -> Result<Arc<ModelType>, DeclarationError> {
        let mut fields: Vec<(String, FieldSpec)> = match &self.parent {
            Some(parent) => parent.fields.clone(),
            None => Vec::new(),
        };
        let mut index: FxHashMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        // Slots already claimed by this declaration, as opposed to inherited.
        let mut declared = vec![false; fields.len()];

        for (name, spec) in self.fields {
            spec.check_declaration(&name)?;
            match index.get(&name).copied() {
                Some(i) if declared[i] => {
                    return Err(DeclarationError::DuplicateField {
                        model: self.name,
                        field: name,
                    });
                }
                Some(i) => {
                    fields[i].1 = spec;
                    declared[i] = true;
                }
                None => {
                    index.insert(name.clone(), fields.len());
                    fields.push((name, spec));
                    declared.push(true);
                }
            }
        }

        let allow_unknown = self
            .allow_unknown
            .or_else(|| self.parent.as_ref().map(|p| p.allow_unknown))
            .unwrap_or(false);

        tracing::debug!(
            model = %self.name,
            fields = fields.len(),
            allow_unknown,
            "declared model type"
        );

        Ok(Arc::new(ModelType {
            name: self.name,
            fields,
            index,
            allow_unknown,
            parent: self.parent,
        }))
    }
}
