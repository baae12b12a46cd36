//! Conversion between instances and the plain JSON value tree.
//!
//! Encoding passes attributes through in insertion order, recursing into
//! nested instances, lists and maps. Decoding is guided by the model's field
//! specs: object specs rebuild nested instances, list and map specs recurse
//! per element, and everything else (including undeclared keys) is copied as
//! a plain value. Decoding never rejects content; that is validation's job.
//! The only failures are structural.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{DecodeError, DeserializeError, EncodeError, ShapeError};
use crate::model::field::check_arity;
use crate::model::{FieldKind, FieldSpec, Instance, ModelType, Value};

// =============================================================================
// ENCODING
// =============================================================================

/// Converts an instance to a JSON object tree.
pub(crate) fn instance_to_tree(instance: &Instance) -> Result<JsonValue, EncodeError> {
    object_to_tree(instance, "")
}

fn object_to_tree(instance: &Instance, prefix: &str) -> Result<JsonValue, EncodeError> {
    let mut map = Map::with_capacity(instance.len());
    for (name, value) in instance.attributes() {
        map.insert(name.to_string(), value_to_tree(value, &format!("{prefix}{name}"))?);
    }
    Ok(JsonValue::Object(map))
}

fn value_to_tree(value: &Value, path: &str) -> Result<JsonValue, EncodeError> {
    let tree = match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or_else(|| EncodeError::NonFiniteFloat {
                field: path.to_string(),
            })?,
        Value::String(s) => JsonValue::String(s.clone()),
        Value::List(items) => JsonValue::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| value_to_tree(item, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, item) in entries {
                map.insert(key.clone(), value_to_tree(item, &format!("{path}[{key}]"))?);
            }
            JsonValue::Object(map)
        }
        Value::Object(instance) => object_to_tree(instance, &format!("{path}."))?,
    };
    Ok(tree)
}

// =============================================================================
// DECODING
// =============================================================================

/// Builds an instance of `model` from a JSON object tree.
pub(crate) fn tree_to_instance(
    model: &Arc<ModelType>,
    tree: JsonValue,
    max_depth: usize,
) -> Result<Instance, DeserializeError> {
    TreeReader { max_depth }.instance(model, tree, 0)
}

struct TreeReader {
    max_depth: usize,
}

impl TreeReader {
    fn instance(
        &self,
        model: &Arc<ModelType>,
        tree: JsonValue,
        depth: usize,
    ) -> Result<Instance, DeserializeError> {
        let map = match tree {
            JsonValue::Object(map) => map,
            other => {
                return Err(ShapeError::ExpectedObject {
                    model: model.name().to_string(),
                    found: json_kind(&other),
                }
                .into());
            }
        };

        let mut instance = Instance::new(model);
        for (name, sub) in map {
            let value = match model.field(&name) {
                Some(spec) => self.field(spec, &name, sub, depth + 1)?,
                None => {
                    if !model.allows_unknown_attributes() {
                        tracing::warn!(
                            model = %model.name(),
                            attribute = %name,
                            "copying undeclared attribute onto strict model"
                        );
                    }
                    self.plain(sub, depth + 1)?
                }
            };
            instance.insert_unchecked(name, value);
        }
        Ok(instance)
    }

    fn field(
        &self,
        spec: &FieldSpec,
        path: &str,
        tree: JsonValue,
        depth: usize,
    ) -> Result<Value, DeserializeError> {
        self.check_depth(depth)?;
        match (spec.kind(), tree) {
            (FieldKind::Object(model), tree @ JsonValue::Object(_)) => {
                Ok(Value::Object(self.instance(model, tree, depth)?))
            }
            (FieldKind::List { elements, .. }, JsonValue::Array(items)) => {
                let values = if let [element] = elements.as_slice() {
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| self.field(element, &format!("{path}[{i}]"), item, depth + 1))
                        .collect::<Result<Vec<_>, _>>()?
                } else {
                    check_arity(path, elements.len(), items.len())?;
                    elements
                        .iter()
                        .zip(items)
                        .enumerate()
                        .map(|(i, (element, item))| {
                            self.field(element, &format!("{path}[{i}]"), item, depth + 1)
                        })
                        .collect::<Result<Vec<_>, _>>()?
                };
                Ok(Value::List(values))
            }
            (FieldKind::Dict { value, .. }, JsonValue::Object(map)) => {
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    let item = self.field(value, &format!("{path}[{key}]"), item, depth + 1)?;
                    entries.insert(key, item);
                }
                Ok(Value::Map(entries))
            }
            // Null, scalars, and anything whose shape disagrees with the spec
            // are copied as-is for validation to judge.
            (_, tree) => self.plain(tree, depth),
        }
    }

    fn plain(&self, tree: JsonValue, depth: usize) -> Result<Value, DeserializeError> {
        self.check_depth(depth)?;
        let value = match tree {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => number_to_value(&n)?,
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| self.plain(item, depth + 1))
                    .collect::<Result<_, _>>()?,
            ),
            JsonValue::Object(map) => {
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    entries.insert(key, self.plain(item, depth + 1)?);
                }
                Value::Map(entries)
            }
        };
        Ok(value)
    }

    fn check_depth(&self, depth: usize) -> Result<(), ShapeError> {
        if depth > self.max_depth {
            return Err(ShapeError::DepthExceeded { max: self.max_depth });
        }
        Ok(())
    }
}

/// Integers and floats stay distinct: a JSON number with a fraction or
/// exponent is a float, everything else an integer.
fn number_to_value(n: &Number) -> Result<Value, DecodeError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    if let Some(u) = n.as_u64() {
        return Err(DecodeError::IntegerOverflow { value: u });
    }
    n.as_f64().map(Value::Float).ok_or_else(|| DecodeError::Malformed {
        message: format!("number {n} is not representable"),
        line: 0,
        column: 0,
    })
}

fn json_kind(tree: &JsonValue) -> &'static str {
    match tree {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
