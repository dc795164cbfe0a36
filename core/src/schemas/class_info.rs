#![deny(missing_docs)]

//! # Class Metadata
//!
//! Naming and inheritance metadata, kept apart from the resolved class body.
//! One entry per registered schema; the join key between raw schema nodes and
//! resolved class names.

use crate::contract::schema::Dialect;
use crate::type_mapping::JavaType;
use serde::Serialize;

/// Class name used when a schema has no extractable name.
pub const PLACEHOLDER_CLASS_NAME: &str = "UnnamedClass";

/// Naming/inheritance metadata of one registered schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelClassInfo {
    /// Name as declared in the contract (component key, Avro name, message name).
    pub original_name: String,
    /// Resolved class name.
    pub class_name: String,
    /// Superclass name, set by a two-member `allOf`.
    pub super_class: Option<String>,
    /// Namespace (Avro namespace), `None` for the application package.
    pub namespace: Option<String>,
    /// Whether a printer may inline the class inside a referencing parent.
    pub can_be_nested: bool,
    /// Whether the schema resolves to an enum rather than a data class.
    pub is_enum: bool,
    /// Schema dialect the class was declared in.
    pub dialect: Dialect,
}

impl ModelClassInfo {
    /// A registered top-level class.
    pub fn standalone(
        original_name: impl Into<String>,
        class_name: impl Into<String>,
        namespace: Option<String>,
        dialect: Dialect,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            class_name: class_name.into(),
            super_class: None,
            namespace,
            can_be_nested: false,
            is_enum: false,
            dialect,
        }
    }

    /// The type a property referencing this class carries.
    pub fn java_type(&self) -> JavaType {
        if self.is_enum {
            JavaType::Enum {
                name: self.class_name.clone(),
                namespace: self.namespace.clone(),
            }
        } else {
            JavaType::Class {
                name: self.class_name.clone(),
                namespace: self.namespace.clone(),
            }
        }
    }

    /// Fully-qualified class name when namespaced, else the simple name.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.class_name),
            None => self.class_name.clone(),
        }
    }
}
