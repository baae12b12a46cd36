//! Field specifications.
//!
//! A [`FieldSpec`] is a reusable rule describing one field's expected shape,
//! range and membership. Specs are attached to a [`ModelType`] at declaration
//! time and never change afterwards.

use std::sync::Arc;

use crate::error::{DeclarationError, ShapeError};
use crate::model::{ModelType, Value};
use crate::validate::{collect_instance, Validation};

/// The variant-specific part of a field spec.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Bool,
    String,
    Integer {
        min: i64,
        max: i64,
    },
    Float {
        min: f64,
        max: f64,
    },
    /// One element spec: every element is checked against it.
    /// Several element specs: fixed arity, element `i` checked against spec `i`.
    List { elements: Vec<FieldSpec> },
    Dict {
        key: Box<FieldSpec>,
        value: Box<FieldSpec>,
    },
    Object(Arc<ModelType>),
}

impl FieldKind {
    /// Returns true for kinds whose values are compared against
    /// `allowed`/`forbidden` sets.
    fn is_scalar(&self) -> bool {
        matches!(
            self,
            FieldKind::Bool | FieldKind::String | FieldKind::Integer { .. } | FieldKind::Float { .. }
        )
    }

    /// Returns a short description used in type-mismatch messages.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Bool => "bool".to_string(),
            FieldKind::String => "string".to_string(),
            FieldKind::Integer { .. } => "integer".to_string(),
            FieldKind::Float { .. } => "float".to_string(),
            FieldKind::List { .. } => "list".to_string(),
            FieldKind::Dict { .. } => "map".to_string(),
            FieldKind::Object(model) => model.name().to_string(),
        }
    }
}

/// Validation rules for a single field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    required: bool,
    nullable: bool,
    allowed: Vec<Value>,
    forbidden: Vec<Value>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    kind: FieldKind,
}

impl FieldSpec {
    /// Creates an optional, non-nullable spec of the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            required: false,
            nullable: false,
            allowed: Vec::new(),
            forbidden: Vec::new(),
            min_len: None,
            max_len: None,
            kind,
        }
    }

    pub fn bool() -> Self {
        Self::new(FieldKind::Bool)
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// Integer spec accepting the full `i64` range.
    pub fn integer() -> Self {
        Self::integer_range(i64::MIN, i64::MAX)
    }

    /// Integer spec accepting `min..=max`.
    pub fn integer_range(min: i64, max: i64) -> Self {
        Self::new(FieldKind::Integer { min, max })
    }

    /// Float spec accepting every finite `f64`.
    pub fn float() -> Self {
        Self::float_range(f64::MIN, f64::MAX)
    }

    /// Float spec accepting `min..=max`.
    pub fn float_range(min: f64, max: f64) -> Self {
        Self::new(FieldKind::Float { min, max })
    }

    /// List spec from one or more element specs.
    ///
    /// With a single element spec the list is homogeneous and may have any
    /// length; with several it has exactly that many elements.
    pub fn list(elements: impl IntoIterator<Item = FieldSpec>) -> Self {
        Self::new(FieldKind::List {
            elements: elements.into_iter().collect(),
        })
    }

    /// Homogeneous list spec.
    pub fn list_of(element: FieldSpec) -> Self {
        Self::list([element])
    }

    /// Map spec checking every key against `key` and every value against `value`.
    pub fn dict(key: FieldSpec, value: FieldSpec) -> Self {
        Self::new(FieldKind::Dict {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Nested model spec.
    pub fn object(model: &Arc<ModelType>) -> Self {
        Self::new(FieldKind::Object(Arc::clone(model)))
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Restricts values to the given set.
    pub fn allowed(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.allowed.extend(values.into_iter().map(Into::into));
        self
    }

    /// Rejects values in the given set.
    pub fn forbidden(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.forbidden.extend(values.into_iter().map(Into::into));
        self
    }

    /// Sets the length bounds of a list spec.
    ///
    /// Only list specs have a length; on any other kind the model declaration
    /// fails with [`DeclarationError::LengthOnNonList`].
    pub fn length(self, min: usize, max: usize) -> Self {
        self.min_length(min).max_length(max)
    }

    /// Sets the minimum length of a list spec.
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    /// Sets the maximum length of a list spec.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn allowed_values(&self) -> &[Value] {
        &self.allowed
    }

    pub fn forbidden_values(&self) -> &[Value] {
        &self.forbidden
    }

    /// Declared `(min, max)` list length, unbounded ends filled in.
    pub fn length_bounds(&self) -> (usize, usize) {
        (self.min_len.unwrap_or(0), self.max_len.unwrap_or(usize::MAX))
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Checks `value` against this spec, reporting errors under `name`.
    pub fn check(&self, name: &str, value: &Value) -> Validation {
        let mut errors = Vec::new();
        self.collect(name, value, &mut errors);
        Validation::from_errors(errors)
    }

    /// Appends every error `value` produces against this spec.
    ///
    /// Null short-circuits: it is either accepted or reported once.
    pub(crate) fn collect(&self, name: &str, value: &Value, errors: &mut Vec<String>) {
        if value.is_null() {
            if !self.nullable {
                errors.push(format!("{name} is not nullable"));
            }
            return;
        }

        self.collect_instance_errors(name, value, errors);
        if self.kind.is_scalar() {
            self.collect_permitted_errors(name, value, errors);
        }
    }

    fn collect_instance_errors(&self, name: &str, value: &Value, errors: &mut Vec<String>) {
        match (&self.kind, value) {
            (FieldKind::Bool, Value::Bool(_)) | (FieldKind::String, Value::String(_)) => {}
            (FieldKind::Integer { min, max }, Value::Integer(v)) => {
                if v < min || v > max {
                    errors.push(format!("{name} must be between {min} and {max}, found {v}"));
                }
            }
            (FieldKind::Float { min, max }, Value::Float(v)) => {
                // Written so that NaN is out of range.
                if !(*min <= *v && *v <= *max) {
                    errors.push(format!("{name} must be between {min:?} and {max:?}, found {v:?}"));
                }
            }
            (FieldKind::List { elements }, Value::List(items)) => {
                let (min_len, max_len) = self.length_bounds();
                collect_list_errors(name, elements, min_len, max_len, items, errors);
            }
            (FieldKind::Dict { key, value: value_spec }, Value::Map(map)) => {
                for (k, v) in map {
                    key.collect(&format!("{name} key {k:?}"), &Value::String(k.clone()), errors);
                    value_spec.collect(&format!("{name}[{k}]"), v, errors);
                }
            }
            (FieldKind::Object(model), Value::Object(instance)) => {
                if Arc::ptr_eq(instance.model_type(), model) {
                    collect_instance(instance, &format!("{name}."), errors);
                } else {
                    errors.push(format!(
                        "{name} must be an instance of {}, found {}",
                        model.name(),
                        instance.model_type().name()
                    ));
                }
            }
            (kind, other) => {
                errors.push(format!(
                    "{name} must be of type {}, found {}",
                    kind.describe(),
                    other.kind()
                ));
            }
        }
    }

    fn collect_permitted_errors(&self, name: &str, value: &Value, errors: &mut Vec<String>) {
        if !self.allowed.is_empty() && !self.allowed.contains(value) {
            errors.push(format!("{name} value {value} is not allowed"));
        }
        if self.forbidden.contains(value) {
            errors.push(format!("{name} value {value} is forbidden"));
        }
    }

    /// Checks structural invariants that are fatal rather than collected:
    /// fixed-arity lists must have exactly as many elements as element specs.
    /// Descends into nested lists, map values and instances.
    pub(crate) fn check_shape(&self, name: &str, value: &Value) -> Result<(), ShapeError> {
        match (&self.kind, value) {
            (FieldKind::List { elements }, Value::List(items)) => {
                if let [element] = elements.as_slice() {
                    for (i, item) in items.iter().enumerate() {
                        element.check_shape(&format!("{name}[{i}]"), item)?;
                    }
                } else {
                    check_arity(name, elements.len(), items.len())?;
                    for (i, (element, item)) in elements.iter().zip(items).enumerate() {
                        element.check_shape(&format!("{name}[{i}]"), item)?;
                    }
                }
                Ok(())
            }
            (FieldKind::Dict { value: value_spec, .. }, Value::Map(map)) => {
                for (k, v) in map {
                    value_spec.check_shape(&format!("{name}[{k}]"), v)?;
                }
                Ok(())
            }
            (FieldKind::Object(_), Value::Object(instance)) => {
                instance.check_shape(&format!("{name}."))
            }
            _ => Ok(()),
        }
    }

    /// Checks that the spec itself is well-formed.
    pub(crate) fn check_declaration(&self, name: &str) -> Result<(), DeclarationError> {
        let has_length = self.min_len.is_some() || self.max_len.is_some();
        if has_length && !matches!(self.kind, FieldKind::List { .. }) {
            return Err(DeclarationError::LengthOnNonList {
                field: name.to_string(),
                kind: self.kind.describe(),
            });
        }
        match &self.kind {
            FieldKind::Integer { min, max } if min > max => Err(DeclarationError::InvalidBounds {
                field: name.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            }),
            FieldKind::Float { min, max } if !(min <= max) => Err(DeclarationError::InvalidBounds {
                field: name.to_string(),
                min: format!("{min:?}"),
                max: format!("{max:?}"),
            }),
            FieldKind::List { elements } => {
                if elements.is_empty() {
                    return Err(DeclarationError::EmptyElementSpecs {
                        field: name.to_string(),
                    });
                }
                let (min_len, max_len) = self.length_bounds();
                if min_len > max_len {
                    return Err(DeclarationError::InvalidLengthBounds {
                        field: name.to_string(),
                        min_len,
                        max_len,
                    });
                }
                for (i, element) in elements.iter().enumerate() {
                    element.check_declaration(&format!("{name}[{i}]"))?;
                }
                Ok(())
            }
            FieldKind::Dict { key, value } => {
                key.check_declaration(&format!("{name} key"))?;
                value.check_declaration(&format!("{name} value"))
            }
            _ => Ok(()),
        }
    }
}

fn collect_list_errors(
    name: &str,
    elements: &[FieldSpec],
    min_len: usize,
    max_len: usize,
    items: &[Value],
    errors: &mut Vec<String>,
) {
    let len = items.len();
    if len < min_len {
        errors.push(format!("{name} must contain at least {min_len} elements, found {len}"));
    }
    if len > max_len {
        errors.push(format!("{name} must contain at most {max_len} elements, found {len}"));
    }

    if let [element] = elements {
        for (i, item) in items.iter().enumerate() {
            element.collect(&format!("{name}[{i}]"), item, errors);
        }
    } else if len == elements.len() {
        for (i, (element, item)) in elements.iter().zip(items).enumerate() {
            element.collect(&format!("{name}[{i}]"), item, errors);
        }
    }
    // A fixed-arity length mismatch is a shape error, reported by
    // `check_shape` on every write path and before serialization.
}

pub(crate) fn check_arity(name: &str, expected: usize, actual: usize) -> Result<(), ShapeError> {
    if expected != actual {
        return Err(ShapeError::ArityMismatch {
            field: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
