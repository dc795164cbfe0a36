//! # Destination Parameters
//!
//! Placeholder extraction from destination patterns, parameter typing with enum
//! detection, and the destination strings derived from a pattern:
//! printf templates for producers and wildcards for consumers.

use crate::contract::schema::{Dialect, SchemaView};
use crate::contract::{Channel, Contract};
use crate::handlers::models::{ChannelParameter, MethodArg, Payload, SendMethod};
use crate::naming::to_identifier;
use crate::schemas::SchemaBuilder;
use crate::type_mapping::JavaType;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Token replacing every placeholder in a consumer destination.
pub const WILDCARD: &str = "*";

fn placeholder_pattern() -> Option<&'static Regex> {
    static PLACEHOLDER_RE: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER_RE
        .get_or_init(|| Regex::new(r"\{([^}]+)}").ok())
        .as_ref()
}

/// Placeholders of a destination pattern with the index of the path segment
/// that holds each one, in order of appearance.
pub fn placeholders(pattern: &str) -> Vec<(String, usize)> {
    let Some(re) = placeholder_pattern() else {
        return Vec::new();
    };
    pattern
        .split('/')
        .enumerate()
        .flat_map(|(position, segment)| {
            re.captures_iter(segment)
                .map(move |cap| (cap[1].to_string(), position))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Extracts the typed parameters of a destination pattern.
///
/// Declared parameters are looked up on the channel. A placeholder without a
/// declaration or without a usable schema falls back to `String`.
pub fn extract_parameters<'c>(
    contract: &'c Contract,
    builder: &mut SchemaBuilder<'_, 'c>,
    pattern: &str,
    channel: &'c Channel,
) -> Vec<ChannelParameter> {
    let found = placeholders(pattern);

    for declared in channel.parameters.keys() {
        if !found.iter().any(|(name, _)| name == declared) {
            tracing::warn!(parameter = %declared, pattern, "Declared parameter does not appear in the destination");
        }
    }

    let mut parameters: Vec<ChannelParameter> = Vec::with_capacity(found.len());
    for (name, position) in found {
        if parameters.iter().any(|p| p.name == name) {
            tracing::warn!(parameter = %name, pattern, "Duplicate placeholder ignored");
            continue;
        }

        let declared = channel
            .parameters
            .get(&name)
            .and_then(|entry| contract.parameter(entry));
        let schema = declared
            .and_then(|p| p.schema.as_ref())
            .and_then(|s| contract.deref_schema(s));

        let (ty, enum_values) = match schema {
            Some(schema) => parameter_type(builder, &name, schema),
            None => {
                tracing::debug!(parameter = %name, "No parameter schema; using String");
                (JavaType::string(), Vec::new())
            }
        };

        parameters.push(ChannelParameter {
            identifier: to_identifier(&name),
            type_name: ty.to_string(),
            ty,
            required: true,
            position,
            has_enum: !enum_values.is_empty(),
            enum_values,
            description: declared.and_then(|p| p.description.clone()),
            name,
        });
    }

    parameters.sort_by_key(|p| p.position);
    parameters
}

fn parameter_type<'c>(
    builder: &mut SchemaBuilder<'_, 'c>,
    name: &str,
    schema: &'c serde_json::Value,
) -> (JavaType, Vec<String>) {
    let view = SchemaView::new(schema);
    if view.is_enum() {
        // Enum parameters keep their scalar type; the literal set travels alongside.
        let ty = JavaType::from_table(view.primary_type().unwrap_or("string"), view.format());
        let ty = match ty {
            JavaType::Object => JavaType::string(),
            other => other,
        };
        return (ty, view.enum_values());
    }

    match builder.resolve_type(name, schema, Dialect::Structural, None) {
        primitive @ JavaType::Primitive { .. } => (primitive, Vec::new()),
        other => {
            tracing::debug!(parameter = name, resolved = %other, "Non-scalar parameter type; using String");
            (JavaType::string(), Vec::new())
        }
    }
}

fn replace_placeholders(pattern: &str, replacement: impl Fn(&str) -> String) -> String {
    match placeholder_pattern() {
        Some(re) => re
            .replace_all(pattern, |cap: &Captures<'_>| replacement(&cap[1]))
            .into_owned(),
        None => pattern.to_string(),
    }
}

/// Replaces every placeholder with the printf token of its parameter's type.
pub fn format_template(pattern: &str, parameters: &[ChannelParameter]) -> String {
    replace_placeholders(pattern, |name| {
        parameters
            .iter()
            .find(|p| p.name == name)
            .map_or("%s", |p| p.ty.print_format())
            .to_string()
    })
}

/// Replaces every placeholder with [`WILDCARD`].
pub fn wildcard_destination(pattern: &str) -> String {
    replace_placeholders(pattern, |_| WILDCARD.to_string())
}

/// Builds the invocation signature of a Send handler.
///
/// `destination_args` holds one identifier per placeholder occurrence in
/// `pattern`, so a repeated placeholder feeds every token of the template.
pub fn send_method(
    name: &str,
    pattern: &str,
    payload: &Payload,
    parameters: &[ChannelParameter],
) -> SendMethod {
    let mut args = vec![MethodArg {
        name: "payload".to_string(),
        type_name: payload.type_name.clone(),
    }];
    args.extend(parameters.iter().map(|p| MethodArg {
        name: p.identifier.clone(),
        type_name: p.type_name.clone(),
    }));

    let signature = args
        .iter()
        .map(|a| format!("{} {}", a.type_name, a.name))
        .collect::<Vec<_>>()
        .join(", ");

    SendMethod {
        name: name.to_string(),
        args,
        signature,
        destination_args: placeholders(pattern)
            .into_iter()
            .map(|(placeholder, _)| {
                parameters
                    .iter()
                    .find(|p| p.name == placeholder)
                    .map_or_else(|| to_identifier(&placeholder), |p| p.identifier.clone())
            })
            .collect(),
    }
}
