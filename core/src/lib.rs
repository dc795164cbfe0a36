#![deny(missing_docs)]

//! # Streamgen Core
//!
//! Resolves an AsyncAPI contract into the intermediate model of a Spring Cloud
//! Stream application: the data classes implied by its schemas and the message
//! handlers implied by its channels.

/// Shared error types.
pub mod error;

/// Identifier normalization (case conversion, reserved words).
pub mod naming;

/// Type mapping logic (contract primitives -> Java types).
pub mod type_mapping;

/// Contract object model, schema identities and `$ref` lookup.
pub mod contract;

/// Caller options and override chains.
pub mod options;

/// Schema Model Resolver.
pub mod schemas;

/// Channel/operation classification and handler consolidation.
pub mod handlers;

/// Result assembly.
pub mod ir;

pub use contract::Contract;
pub use error::{AppError, AppResult};
pub use handlers::{Handler, HandlerKind};
pub use ir::{resolve_contract, AppProperty, ApplicationInfo, ModelIr};
pub use options::{Binder, GeneratorOptions, View};
pub use schemas::{ModelProperty, ModelSchema};
