//! fieldspec: declarative record types with typed field specs.
//!
//! This crate lets applications declare structured record types as explicit
//! values, validate instances against them, and convert instances to and
//! from JSON text.
//!
//! # Overview
//!
//! - **Declarations are values**: a [`ModelType`] is built once from an
//!   ordered list of `(name, FieldSpec)` pairs and shared through an `Arc`.
//! - **Validation aggregates**: [`Instance::validate`] reports every problem
//!   in one pass instead of stopping at the first.
//! - **Round-trip fidelity**: `deserialize(serialize(x))` rebuilds nested
//!   instances, homogeneous and fixed-arity lists, and lists of lists.
//!
//! # Quick Start
//!
//! ```rust
//! use fieldspec::{deserialize, serialize, FieldSpec, Instance, ModelType, Value};
//!
//! let stats = ModelType::builder("Statistics")
//!     .field("level", FieldSpec::integer_range(0, 60).required())
//!     .field("time_played", FieldSpec::float().nullable())
//!     .build()
//!     .unwrap();
//!
//! let account = ModelType::builder("Account")
//!     .field("username", FieldSpec::string().required().forbidden(["bob"]))
//!     .field("stats", FieldSpec::object(&stats).required())
//!     .build()
//!     .unwrap();
//!
//! let mut instance = Instance::new(&account);
//! instance.set("username", "django").unwrap();
//! instance
//!     .set("stats", Instance::new(&stats).with("level", 0).unwrap())
//!     .unwrap();
//!
//! let text = serialize(&instance).unwrap();
//! assert_eq!(text, r#"{"username": "django", "stats": {"level": 0}}"#);
//!
//! let decoded = deserialize(&account, &text).unwrap();
//! assert_eq!(decoded, instance);
//! assert_eq!(decoded.get("username"), Some(&Value::from("django")));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Values, field specs, model types, instances, registry
//! - [`validate`]: Instance validation and the [`Validation`] report
//! - [`codec`]: JSON serialization and deserialization
//! - [`error`]: Error types
//! - [`limits`]: Limits for untrusted input
//!
//! # Faults
//!
//! Structural violations (fixed-arity list length, undeclared attribute on a
//! strict model, non-object input) are [`ShapeError`]s and always fatal.
//! Content problems are collected by validation; `serialize` and
//! `deserialize` escalate a failed validation to a [`ValidationError`]
//! carrying every message.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    deserialize, deserialize_named, deserialize_with_options, from_tree, from_tree_with_options,
    serialize, serialize_with_options, to_tree, DeserializeOptions, SerializeOptions,
};
pub use error::{
    DeclarationError, DecodeError, DeserializeError, EncodeError, SerializeError, ShapeError,
    ValidationError,
};
pub use model::{
    FieldKind, FieldSpec, Instance, ModelRegistry, ModelType, ModelTypeBuilder, Value, ValueKind,
};
pub use validate::{validate_instance, Validation};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
