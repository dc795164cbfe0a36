//! # Handler Naming
//!
//! Priority: explicit override, operation id (unless a generic verb), queue name,
//! single message name, channel path synthesis.

use crate::contract::schema::ANONYMOUS_MARKER;
use crate::handlers::models::{Handler, HandlerKind};
use crate::naming::{lower_first, synthesize_path_name, to_type_name};
use std::collections::HashSet;

/// Operation ids that say nothing about the operation.
const GENERIC_OPERATION_IDS: &[&str] = &["publish", "subscribe", "send", "receive"];

/// Everything a handler name may be derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSources<'a> {
    /// `x-scs-function-name`.
    pub custom: Option<&'a str>,
    /// `operationId`.
    pub operation_id: Option<&'a str>,
    /// Bound durable queue.
    pub queue: Option<&'a str>,
    /// Name of the single message carried.
    pub message: Option<&'a str>,
    /// Raw channel name.
    pub channel: &'a str,
}

fn is_generic_operation_id(id: &str) -> bool {
    GENERIC_OPERATION_IDS
        .iter()
        .any(|verb| verb.eq_ignore_ascii_case(id.trim()))
}

/// The unsuffixed base name, before the override is considered.
pub fn base_name(sources: &NameSources<'_>) -> String {
    let candidate = sources
        .operation_id
        .filter(|id| !id.trim().is_empty() && !is_generic_operation_id(id))
        .or(sources.queue)
        .or(sources.message)
        .filter(|name| *name != sources.channel && !name.contains(ANONYMOUS_MARKER));

    let base = match candidate {
        Some(name) => lower_first(&to_type_name(name)),
        None => synthesize_path_name(sources.channel),
    };
    if base.is_empty() {
        "handler".to_string()
    } else {
        base
    }
}

/// The final handler name for a kind.
///
/// An explicit override is used verbatim, without suffix.
pub fn handler_name(sources: &NameSources<'_>, kind: HandlerKind) -> String {
    if let Some(custom) = sources.custom {
        return custom.to_string();
    }
    let base = base_name(sources);
    match kind {
        HandlerKind::Supplier => format!("{}Supplier", base),
        HandlerKind::Consumer => format!("{}Consumer", base),
        HandlerKind::Send => format!("send{}", to_type_name(&base)),
        HandlerKind::Function => base,
    }
}

/// Renames every handler whose name an earlier handler already holds by
/// appending the first free counter (`evtSupplier2`). Bean and binding names
/// must be unique within one application.
pub fn ensure_unique_names(handlers: &mut [Handler]) {
    let declared: HashSet<String> = handlers.iter().map(|h| h.name.clone()).collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(handlers.len());

    for handler in handlers.iter_mut() {
        if taken.insert(handler.name.clone()) {
            continue;
        }
        let renamed = (2..)
            .map(|n| format!("{}{}", handler.name, n))
            .find(|candidate| !taken.contains(candidate) && !declared.contains(candidate))
            .unwrap_or_else(|| handler.name.clone());
        tracing::warn!(handler = %handler.name, renamed = %renamed, "Handler name already taken; renamed");
        if let Some(method) = handler.send_method.as_mut() {
            method.name = renamed.clone();
        }
        taken.insert(renamed.clone());
        handler.name = renamed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut sources = NameSources {
            custom: None,
            operation_id: Some("placeOrder"),
            queue: Some("order-queue"),
            message: Some("OrderPlaced"),
            channel: "orders/placed",
        };
        assert_eq!(base_name(&sources), "placeOrder");

        sources.operation_id = Some("publish");
        assert_eq!(base_name(&sources), "orderQueue");

        sources.queue = None;
        assert_eq!(base_name(&sources), "orderPlaced");

        sources.message = None;
        assert_eq!(base_name(&sources), "ordersPlaced");
    }

    #[test]
    fn test_suffixes_and_override() {
        let sources = NameSources {
            message: Some("OrderPlaced"),
            channel: "orders/{region}",
            ..NameSources::default()
        };
        assert_eq!(handler_name(&sources, HandlerKind::Send), "sendOrderPlaced");
        assert_eq!(
            handler_name(&sources, HandlerKind::Supplier),
            "orderPlacedSupplier"
        );
        assert_eq!(
            handler_name(&sources, HandlerKind::Consumer),
            "orderPlacedConsumer"
        );

        let custom = NameSources {
            custom: Some("ledgerSync"),
            ..sources
        };
        assert_eq!(handler_name(&custom, HandlerKind::Consumer), "ledgerSync");
    }

    #[test]
    fn test_fallback_to_path_synthesis() {
        let raw_channel = NameSources {
            operation_id: Some("orders"),
            channel: "orders",
            ..NameSources::default()
        };
        assert_eq!(base_name(&raw_channel), "orders");

        let anonymous = NameSources {
            message: Some("<anonymous-message-1>"),
            channel: "orders/status",
            ..NameSources::default()
        };
        assert_eq!(base_name(&anonymous), "ordersStatus");

        let queue = NameSources {
            queue: Some("status-queue"),
            channel: "orders/status",
            ..NameSources::default()
        };
        assert_eq!(
            handler_name(&queue, HandlerKind::Consumer),
            "statusQueueConsumer"
        );
    }

    fn supplier(name: &str) -> Handler {
        Handler {
            name: name.into(),
            kind: HandlerKind::Supplier,
            custom_name: None,
            input: None,
            output: None,
            has_enum_parameters: false,
            send_method: None,
            summary: None,
        }
    }

    #[test]
    fn test_duplicate_names_get_counters() {
        let mut handlers = vec![
            supplier("evtSupplier"),
            supplier("evtSupplier"),
            supplier("evtSupplier2"),
            supplier("evtSupplier"),
        ];
        ensure_unique_names(&mut handlers);
        let names: Vec<&str> = handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["evtSupplier", "evtSupplier3", "evtSupplier2", "evtSupplier4"]
        );
    }
}
