//! Instance validation.
//!
//! Validation walks an instance against its model type and collects every
//! problem it finds rather than stopping at the first. It never mutates the
//! instance and never fails: the outcome is a [`Validation`] report that the
//! caller can inspect, or escalate with [`Validation::into_result`].
//!
//! Errors are ordered by field declaration order, followed by one error per
//! undeclared attribute when the model is strict. Nested instance errors are
//! reported under a dotted path (`stats.level`), list elements under
//! `name[i]` and map entries under `name[key]`.

use crate::error::ValidationError;
use crate::model::Instance;

/// Outcome of validating a value or an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    errors: Vec<String>,
}

impl Validation {
    pub(crate) fn from_errors(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// True if no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Converts a failed report into a [`ValidationError`] for `model`.
    pub fn into_result(self, model: &str) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                model: model.to_string(),
                errors: self.errors,
            })
        }
    }
}

impl From<Validation> for (bool, Vec<String>) {
    fn from(validation: Validation) -> Self {
        (validation.is_valid(), validation.errors)
    }
}

/// Validates an instance against its model type.
pub fn validate_instance(instance: &Instance) -> Validation {
    let mut errors = Vec::new();
    collect_instance(instance, "", &mut errors);
    Validation::from_errors(errors)
}

/// Appends the errors of `instance`, naming fields `{prefix}{field}`.
pub(crate) fn collect_instance(instance: &Instance, prefix: &str, errors: &mut Vec<String>) {
    let model = instance.model_type();

    for (name, spec) in model.fields() {
        match instance.get(name) {
            Some(value) => spec.collect(&format!("{prefix}{name}"), value, errors),
            None if spec.is_required() => errors.push(format!("{prefix}{name} is required")),
            None => {}
        }
    }

    if !model.allows_unknown_attributes() {
        for (name, _) in instance.attributes() {
            if !model.has_field(name) {
                errors.push(format!(
                    "{prefix}{name} is not a field of {}",
                    model.name()
                ));
            }
        }
    }
}
