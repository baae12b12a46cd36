//! JSON text serialization and deserialization.

use std::io;
use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Serializer, Value as JsonValue};

use crate::codec::tree::{instance_to_tree, tree_to_instance};
use crate::error::{DecodeError, DeserializeError, EncodeError, SerializeError, ShapeError};
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{Instance, ModelRegistry, ModelType};

/// Options for serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// Emit indented, multi-line JSON instead of the single-line form.
    pub pretty: bool,
}

impl SerializeOptions {
    /// Creates default (single-line) serialization options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates pretty-printing serialization options.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Options for deserialization.
#[derive(Debug, Clone, Copy)]
pub struct DeserializeOptions {
    /// Maximum value depth below the top-level object.
    pub max_depth: usize,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl DeserializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Serializes a valid instance to single-line JSON text.
///
/// The instance is validated first; an invalid instance is never emitted.
/// Object keys follow attribute insertion order and unset fields are omitted.
/// Separators are `": "` and `", "`, so a one-field instance reads
/// `{"field": 12}`.
pub fn serialize(instance: &Instance) -> Result<String, SerializeError> {
    serialize_with_options(instance, SerializeOptions::default())
}

/// Serializes a valid instance to JSON text with the given options.
pub fn serialize_with_options(
    instance: &Instance,
    options: SerializeOptions,
) -> Result<String, SerializeError> {
    let tree = to_tree(instance)?;
    let mut out = Vec::with_capacity(128);
    if options.pretty {
        tree.serialize(&mut Serializer::pretty(&mut out))
    } else {
        tree.serialize(&mut Serializer::with_formatter(&mut out, SpacedFormatter))
    }
    .map_err(EncodeError::from)?;
    let text = String::from_utf8(out).map_err(|err| EncodeError::Json(err.to_string()))?;
    Ok(text)
}

/// Single-line layout with a space after every `:` and `,`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Validates an instance and converts it to a plain JSON value tree.
///
/// Fixed-arity lists are checked first and fail with a [`ShapeError`].
pub fn to_tree(instance: &Instance) -> Result<JsonValue, SerializeError> {
    let model = instance.model_type();
    instance.check_shape("")?;
    let validation = instance.validate();
    if !validation.is_valid() {
        tracing::debug!(
            model = %model.name(),
            errors = validation.errors().len(),
            "refusing to serialize invalid instance"
        );
    }
    validation.into_result(model.name())?;
    Ok(instance_to_tree(instance)?)
}

/// Deserializes JSON text into a validated instance of `model`.
pub fn deserialize(model: &Arc<ModelType>, text: &str) -> Result<Instance, DeserializeError> {
    deserialize_with_options(model, text, DeserializeOptions::default())
}

/// Deserializes JSON text into a validated instance with the given options.
pub fn deserialize_with_options(
    model: &Arc<ModelType>,
    text: &str,
    options: DeserializeOptions,
) -> Result<Instance, DeserializeError> {
    let tree: JsonValue = serde_json::from_str(text).map_err(DecodeError::from)?;
    from_tree_with_options(model, tree, options)
}

/// Deserializes JSON text into an instance of the model registered as `name`.
pub fn deserialize_named(
    registry: &ModelRegistry,
    name: &str,
    text: &str,
) -> Result<Instance, DeserializeError> {
    let model = registry.get(name).ok_or_else(|| ShapeError::UnknownModel {
        name: name.to_string(),
    })?;
    deserialize(model, text)
}

/// Builds a validated instance of `model` from a plain JSON value tree.
pub fn from_tree(model: &Arc<ModelType>, tree: JsonValue) -> Result<Instance, DeserializeError> {
    from_tree_with_options(model, tree, DeserializeOptions::default())
}

/// Builds a validated instance from a value tree with the given options.
pub fn from_tree_with_options(
    model: &Arc<ModelType>,
    tree: JsonValue,
    options: DeserializeOptions,
) -> Result<Instance, DeserializeError> {
    let instance = tree_to_instance(model, tree, options.max_depth)?;
    let validation = instance.validate();
    if !validation.is_valid() {
        tracing::debug!(
            model = %model.name(),
            errors = validation.errors().len(),
            "deserialized instance failed validation"
        );
    }
    validation.into_result(model.name())?;
    Ok(instance)
}
