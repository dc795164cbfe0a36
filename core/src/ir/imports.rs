//! # Cross-Reference Imports
//!
//! Payload classes living outside the application package must be imported by
//! whatever prints the handlers.

use crate::handlers::{Endpoint, Handler};
use crate::schemas::collect_class_imports;
use crate::type_mapping::JavaType;
use std::collections::BTreeSet;

/// Qualified names of payload classes declared outside `package`.
pub fn cross_reference_imports(handlers: &[Handler], package: &str) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();
    let endpoints = handlers
        .iter()
        .flat_map(|handler| handler.input.iter().chain(handler.output.iter()));
    for endpoint in endpoints {
        for ty in payload_types(endpoint) {
            collect_class_imports(ty, Some(package), &mut imports);
        }
    }
    imports
}

fn payload_types(endpoint: &Endpoint) -> impl Iterator<Item = &JavaType> {
    let payload = &endpoint.payload;
    let own = payload.variant_types.is_empty().then_some(&payload.ty);
    payload.variant_types.iter().chain(own)
}
