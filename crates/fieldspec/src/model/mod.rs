//! Data model types.
//!
//! This module contains the declaration-side and instance-side types:
//! - Values (what instances hold)
//! - Field specs (per-field rules)
//! - Model types (named, ordered field tables)
//! - Instances (records of one model type)
//! - Registry (model types by name)

pub mod field;
pub mod instance;
pub mod model_type;
pub mod registry;
pub mod value;

pub use field::{FieldKind, FieldSpec};
pub use instance::Instance;
pub use model_type::{ModelType, ModelTypeBuilder};
pub use registry::ModelRegistry;
pub use value::{Value, ValueKind};
