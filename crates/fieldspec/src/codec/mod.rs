//! JSON encoding/decoding for model instances.
//!
//! Serialization validates, converts the instance to a plain value tree
//! (`serde_json::Value`) and encodes it. Deserialization decodes, rebuilds the
//! instance graph guided by the model's field specs, and validates.

pub mod json;
mod tree;

pub use json::{
    deserialize, deserialize_named, deserialize_with_options, from_tree, from_tree_with_options,
    serialize, serialize_with_options, to_tree, DeserializeOptions, SerializeOptions,
};
