//! # Destination Consolidation
//!
//! Suppliers writing to the same destination, and Consumers draining the same
//! durable queue, collapse into the first handler seen for that key. The survivor
//! accumulates the message variants of the merged handlers.
//!
//! Non-durable Consumers and Send handlers are never merged.

use crate::handlers::bindings::merge_subscriptions;
use crate::handlers::models::{Handler, HandlerKind};
use indexmap::IndexMap;

/// What makes two handlers address the same transport target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MergeKey {
    Destination(String),
    Queue(String),
}

fn merge_key(handler: &Handler) -> Option<MergeKey> {
    match handler.kind {
        HandlerKind::Supplier => handler
            .output
            .as_ref()
            .map(|output| MergeKey::Destination(output.destination.clone())),
        HandlerKind::Consumer => handler
            .input
            .as_ref()
            .and_then(|input| input.queue.as_ref())
            .map(|queue| MergeKey::Queue(queue.name.clone())),
        HandlerKind::Function | HandlerKind::Send => None,
    }
}

/// Merges handlers sharing a destination or durable queue.
pub fn consolidate(handlers: Vec<Handler>) -> Vec<Handler> {
    let mut survivors: Vec<Handler> = Vec::with_capacity(handlers.len());
    let mut seen: IndexMap<MergeKey, usize> = IndexMap::new();

    for handler in handlers {
        let Some(key) = merge_key(&handler) else {
            survivors.push(handler);
            continue;
        };
        match seen.get(&key) {
            Some(&index) => {
                tracing::debug!(survivor = %survivors[index].name, merged = %handler.name, "Consolidating handler");
                absorb(&mut survivors[index], &handler);
            }
            None => {
                seen.insert(key, survivors.len());
                survivors.push(handler);
            }
        }
    }

    survivors
}

fn absorb(survivor: &mut Handler, merged: &Handler) {
    let (Some(target), Some(source)) = (survivor.primary_endpoint_mut(), merged.primary_endpoint()) else {
        return;
    };
    target.payload.absorb(&source.payload);
    if let (Some(queue), Some(other)) = (target.queue.as_mut(), source.queue.as_ref()) {
        merge_subscriptions(queue, other);
    }
    survivor.has_enum_parameters |= merged.has_enum_parameters;
}
