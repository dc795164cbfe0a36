#![deny(missing_docs)]

//! # Schema Model Resolver
//!
//! Turns the contract's schemas (structural and record dialects) into the data
//! classes of the IR.
//!
//! - `registry`: per-contract class registry ([`ResolverContext`]).
//! - `class_info`: naming/inheritance metadata ([`ModelClassInfo`]).
//! - `properties`: property type resolution and class bodies ([`SchemaBuilder`]).
//! - `enums`: enum literal normalization.

pub mod class_info;
pub mod enums;
pub mod properties;
pub mod registry;

pub use class_info::{ModelClassInfo, PLACEHOLDER_CLASS_NAME};
pub use enums::{enum_constants, normalize_enum_literal, EnumConstant};
pub use properties::SchemaBuilder;
pub use registry::{RegisteredSchema, ResolverContext};

use crate::contract::schema::{Bounds, Dialect};
use crate::type_mapping::JavaType;
use serde::Serialize;
use std::collections::BTreeSet;

/// Whether a schema prints as a data class or an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaKind {
    /// A data class with properties.
    Class,
    /// An enum with constants.
    Enum,
}

/// One generated data class (or enum).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSchema {
    /// Name as declared in the contract.
    pub original_name: String,
    /// Resolved class name.
    pub class_name: String,
    /// Namespace, `None` for the application package.
    pub namespace: Option<String>,
    /// Class or enum.
    pub kind: SchemaKind,
    /// Documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Properties in declaration order.
    pub properties: Vec<ModelProperty>,
    /// Enum constants (enums only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_constants: Vec<EnumConstant>,
    /// Superclass name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_class: Option<String>,
    /// False when a printer may nest the class inside its referencing parent.
    pub is_standalone: bool,
    /// Dialect the schema was declared in.
    pub dialect: Dialect,
    /// True when at least one property identifier differs from its wire name.
    pub needs_escaping: bool,
    /// Qualified types the class body needs.
    pub imports: BTreeSet<String>,
}

impl ModelSchema {
    /// Walks this schema and every nested schema, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a ModelSchema)) {
        f(self);
        for property in &self.properties {
            if let Some(nested) = &property.nested {
                nested.visit(f);
            }
        }
    }

    /// Looks up a property by wire name.
    pub fn property(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One property of a generated class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProperty {
    /// Wire name.
    pub name: String,
    /// Escaped identifier.
    pub identifier: String,
    /// Semantic type.
    #[serde(rename = "type")]
    pub ty: JavaType,
    /// Rendered type, e.g. `List<Order>`.
    pub type_name: String,
    /// Whether the property is required.
    pub required: bool,
    /// Numeric and size constraints.
    #[serde(skip_serializing_if = "Bounds::is_empty")]
    pub bounds: Bounds,
    /// Enum literals when the property is constrained to a set of values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Inline class (or enum) declared by this property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<ModelSchema>>,
    /// Documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Resolves every registered class of the context, in registration order.
pub fn resolve_schemas(ctx: &ResolverContext<'_>) -> Vec<ModelSchema> {
    let mut builder = SchemaBuilder::new(ctx);
    ctx.registered()
        .map(|(key, entry)| builder.build_registered(key, entry))
        .collect()
}

/// Adds the qualified names of generated classes referenced by `ty` that live in
/// a namespace other than `own_namespace`.
pub fn collect_class_imports(ty: &JavaType, own_namespace: Option<&str>, into: &mut BTreeSet<String>) {
    match ty {
        JavaType::List { item } => collect_class_imports(item, own_namespace, into),
        JavaType::Map { value } => collect_class_imports(value, own_namespace, into),
        JavaType::Class {
            namespace: Some(ns),
            ..
        }
        | JavaType::Enum {
            namespace: Some(ns),
            ..
        } if Some(ns.as_str()) != own_namespace => {
            if let Some(qualified) = ty.qualified_name() {
                into.insert(qualified);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Contract;

    fn resolve(yaml: &str) -> Vec<ModelSchema> {
        let contract = Contract::from_yaml(yaml).unwrap();
        let ctx = ResolverContext::build(&contract);
        resolve_schemas(&ctx)
    }

    #[test]
    fn test_collect_class_imports() {
        let ty = JavaType::list(JavaType::Class {
            name: "Account".into(),
            namespace: Some("com.acme.ledger".into()),
        });
        let mut imports = BTreeSet::new();
        collect_class_imports(&ty, Some("com.acme.ledger"), &mut imports);
        assert!(imports.is_empty());
        collect_class_imports(&ty, None, &mut imports);
        assert!(imports.contains("com.acme.ledger.Account"));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let yaml = r#"
components:
  schemas:
    Order:
      type: object
      properties:
        lines:
          type: array
          items:
            type: object
            properties:
              sku:
                type: string
"#;
        assert_eq!(resolve(yaml), resolve(yaml));
    }

    #[test]
    fn test_visit_reaches_nested_schemas() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Order:
      type: object
      properties:
        customer:
          type: object
          properties:
            address:
              type: object
              properties:
                city:
                  type: string
"#,
        );
        let mut names = Vec::new();
        schemas[0].visit(&mut |s| names.push(s.class_name.clone()));
        assert_eq!(names, vec!["Order", "Customer", "Address"]);
    }
}
