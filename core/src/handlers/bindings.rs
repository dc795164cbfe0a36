//! # Protocol Bindings
//!
//! Reads durable-queue declarations from the `solace` operation binding:
//!
//! ```yaml
//! bindings:
//!   solace:
//!     destinations:
//!       - destinationType: queue
//!         queue:
//!           name: status-queue
//!           topicSubscriptions: [orders/status/created]
//! ```
//!
//! Anything shaped differently is read as "no queue binding".

use crate::contract::Operation;
use crate::handlers::models::QueueInfo;
use serde_json::Value;

/// Binding key of the Solace protocol.
pub const SOLACE_BINDING: &str = "solace";

/// Durable queues declared on an operation, in declaration order.
pub fn solace_queues(operation: &Operation) -> Vec<QueueInfo> {
    let Some(binding) = operation.bindings.get(SOLACE_BINDING) else {
        return Vec::new();
    };
    let Some(destinations) = binding.get("destinations").and_then(Value::as_array) else {
        tracing::debug!("Solace binding without a destinations list; no queue binding");
        return Vec::new();
    };
    destinations.iter().filter_map(queue_destination).collect()
}

fn queue_destination(destination: &Value) -> Option<QueueInfo> {
    let kind = destination.get("destinationType").and_then(Value::as_str);
    let queue = destination.get("queue");
    let is_queue = match kind {
        Some(kind) => kind.eq_ignore_ascii_case("queue"),
        None => queue.is_some(),
    };
    if !is_queue {
        return None;
    }

    let Some(name) = queue
        .and_then(|q| q.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
    else {
        tracing::warn!("Queue destination without a usable name ignored");
        return None;
    };

    let topic_subscriptions = match queue.and_then(|q| q.get("topicSubscriptions")) {
        Some(Value::Array(topics)) => topics
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    };

    Some(QueueInfo {
        name: name.to_string(),
        topic_subscriptions,
    })
}

/// Appends subscriptions from `other` that `target` does not have yet.
pub fn merge_subscriptions(target: &mut QueueInfo, other: &QueueInfo) {
    for topic in &other.topic_subscriptions {
        if !target.topic_subscriptions.contains(topic) {
            target.topic_subscriptions.push(topic.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(yaml: &str) -> Operation {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_reads_queue_destinations() {
        let op = operation(
            r#"
bindings:
  solace:
    destinations:
      - destinationType: queue
        queue:
          name: status-queue
          topicSubscriptions:
            - orders/status/created
            - orders/status/updated
      - destinationType: topic
      - destinationType: queue
        queue:
          name: audit-queue
"#,
        );
        let queues = solace_queues(&op);
        assert_eq!(queues.len(), 2);
        assert_eq!(queues[0].name, "status-queue");
        assert_eq!(
            queues[0].topic_subscriptions,
            vec!["orders/status/created", "orders/status/updated"]
        );
        assert_eq!(queues[1].name, "audit-queue");
        assert!(queues[1].topic_subscriptions.is_empty());
    }

    #[test]
    fn test_malformed_bindings_mean_no_queue() {
        assert!(solace_queues(&operation("bindings:\n  solace:\n    destinations: nope\n")).is_empty());
        assert!(solace_queues(&operation("bindings:\n  solace: true\n")).is_empty());
        assert!(solace_queues(&operation(
            "bindings:\n  solace:\n    destinations:\n      - destinationType: queue\n        queue: {}\n"
        ))
        .is_empty());
        assert!(solace_queues(&operation("bindings:\n  kafka:\n    groupId: g\n")).is_empty());
    }

    #[test]
    fn test_merge_subscriptions_keeps_first_order() {
        let mut target = QueueInfo {
            name: "q".into(),
            topic_subscriptions: vec!["a".into(), "b".into()],
        };
        let other = QueueInfo {
            name: "q".into(),
            topic_subscriptions: vec!["b".into(), "c".into()],
        };
        merge_subscriptions(&mut target, &other);
        assert_eq!(target.topic_subscriptions, vec!["a", "b", "c"]);
    }
}
