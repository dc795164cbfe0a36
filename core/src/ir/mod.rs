#![deny(missing_docs)]

//! # Result Assembler
//!
//! Runs the whole pipeline over one contract and publishes the intermediate
//! representation handed to the printers.

pub mod imports;
pub mod properties;

pub use imports::cross_reference_imports;
pub use properties::{application_properties, AppProperty};

use crate::contract::Contract;
use crate::error::AppResult;
use crate::handlers::{resolve_handlers, Handler};
use crate::options::{Binder, GeneratorOptions, View};
use crate::schemas::{resolve_schemas, ModelSchema, ResolverContext};
use serde::Serialize;
use std::collections::BTreeSet;

/// Application-level facts the printers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    /// Contract title.
    pub title: String,
    /// Contract version.
    pub version: String,
    /// Contract description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Package the application is generated into.
    pub package: String,
    /// Application class name.
    pub class_name: String,
    /// Direction view in effect.
    pub view: View,
    /// Selected binder.
    pub binder: Binder,
}

/// The published intermediate representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelIr {
    /// Application metadata.
    pub application: ApplicationInfo,
    /// Data classes in registration order.
    pub schemas: Vec<ModelSchema>,
    /// Consolidated and grouped handlers.
    pub handlers: Vec<Handler>,
    /// Payload classes to import from other namespaces.
    pub cross_reference_imports: BTreeSet<String>,
    /// Binding configuration lines.
    pub application_properties: Vec<AppProperty>,
}

/// Resolves a contract into its IR.
///
/// The binder is validated before anything else; it is the only input whose
/// problems abort resolution.
pub fn resolve_contract(contract: &Contract, options: &GeneratorOptions) -> AppResult<ModelIr> {
    let binder = options.binder()?;
    let info = &contract.info;
    let view = options.resolve_view(info);
    let package = options.resolve_package(info);
    let class_name = options.resolve_application_class(info);

    let ctx = ResolverContext::build(contract);
    let schemas = resolve_schemas(&ctx);
    let handlers = resolve_handlers(&ctx, view, binder);
    let cross_reference_imports = cross_reference_imports(&handlers, &package);
    let application_properties = application_properties(&handlers, binder);

    tracing::info!(
        schemas = schemas.len(),
        handlers = handlers.len(),
        %view,
        %binder,
        "contract resolved"
    );

    Ok(ModelIr {
        application: ApplicationInfo {
            title: info.title.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
            package,
            class_name,
            view,
            binder,
        },
        schemas,
        handlers,
        cross_reference_imports,
        application_properties,
    })
}
