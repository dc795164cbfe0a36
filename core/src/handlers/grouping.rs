//! # Custom-Name Grouping
//!
//! Handlers declared with the same `x-scs-function-name` pair up into one
//! Function: the consuming member supplies the input, the producing member the
//! output. Only a pair of exactly one producer and one Consumer is grouped;
//! anything else is left as declared.

use crate::handlers::models::{Handler, HandlerKind};
use indexmap::IndexMap;

/// Replaces every valid producer/consumer pair sharing a name override with
/// a single Function, placed where the first member was.
pub fn group_by_custom_name(handlers: Vec<Handler>) -> Vec<Handler> {
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (index, handler) in handlers.iter().enumerate() {
        if let Some(custom) = &handler.custom_name {
            groups.entry(custom.clone()).or_default().push(index);
        }
    }

    let mut slots: Vec<Option<Handler>> = handlers.into_iter().map(Some).collect();
    for (name, members) in &groups {
        if members.len() == 1 {
            continue;
        }
        let Some((producer, consumer)) = split_pair(&slots, members) else {
            tracing::warn!(
                function = %name,
                members = members.len(),
                "Custom name must pair one producer with one consumer; leaving handlers ungrouped"
            );
            continue;
        };

        let first = members[0];
        let (Some(producer), Some(consumer)) = (slots[producer].take(), slots[consumer].take()) else {
            continue;
        };
        slots[first] = Some(function(name, producer, consumer));
    }

    slots.into_iter().flatten().collect()
}

/// Indices of the producer and the consumer when `members` is a valid pair.
fn split_pair(slots: &[Option<Handler>], members: &[usize]) -> Option<(usize, usize)> {
    let [a, b] = members else {
        return None;
    };
    let kind = |index: usize| slots[index].as_ref().map(|h| h.kind);
    match (kind(*a)?, kind(*b)?) {
        (p, HandlerKind::Consumer) if p.is_producer() => Some((*a, *b)),
        (HandlerKind::Consumer, p) if p.is_producer() => Some((*b, *a)),
        _ => None,
    }
}

fn function(name: &str, producer: Handler, consumer: Handler) -> Handler {
    tracing::debug!(function = name, input = %consumer.name, output = %producer.name, "Grouped into Function");
    Handler {
        name: name.to_string(),
        kind: HandlerKind::Function,
        custom_name: Some(name.to_string()),
        input: consumer.input,
        output: producer.output,
        has_enum_parameters: producer.has_enum_parameters || consumer.has_enum_parameters,
        send_method: None,
        summary: consumer.summary.or(producer.summary),
    }
}
