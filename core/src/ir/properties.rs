//! # Application Properties
//!
//! Flattened Spring Cloud Stream binding configuration derived from the final
//! handler list. Binding names follow the `<function>-in-0` / `<function>-out-0`
//! convention; Send handlers publish through `StreamBridge` and get no binding.

use crate::handlers::{Endpoint, Handler, HandlerKind};
use crate::options::Binder;
use serde::Serialize;
use std::fmt::{self, Display};

/// Property listing every function bean, `;`-separated.
pub const FUNCTION_DEFINITION: &str = "spring.cloud.function.definition";
/// Property selecting the default binder.
pub const DEFAULT_BINDER: &str = "spring.cloud.stream.default-binder";

const BINDINGS_PREFIX: &str = "spring.cloud.stream.bindings";
const SOLACE_BINDINGS_PREFIX: &str = "spring.cloud.stream.solace.bindings";

/// One `key=value` configuration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppProperty {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
}

impl AppProperty {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Display for AppProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Derives the binding configuration for the handlers under a binder.
pub fn application_properties(handlers: &[Handler], binder: Binder) -> Vec<AppProperty> {
    let mut properties = Vec::new();

    let definition: Vec<&str> = handlers
        .iter()
        .filter(|h| h.kind != HandlerKind::Send)
        .map(|h| h.name.as_str())
        .collect();
    if !definition.is_empty() {
        properties.push(AppProperty::new(FUNCTION_DEFINITION, definition.join(";")));
    }

    for handler in handlers.iter().filter(|h| h.kind != HandlerKind::Send) {
        if let Some(output) = &handler.output {
            if !output.dynamic {
                let binding = format!("{}-out-0", handler.name);
                properties.push(AppProperty::new(
                    format!("{}.{}.destination", BINDINGS_PREFIX, binding),
                    output.destination.clone(),
                ));
            }
        }
        if let Some(input) = &handler.input {
            input_properties(&handler.name, input, binder, &mut properties);
        }
    }

    properties.push(AppProperty::new(DEFAULT_BINDER, binder.to_string()));
    properties
}

fn input_properties(function: &str, input: &Endpoint, binder: Binder, into: &mut Vec<AppProperty>) {
    let binding = format!("{}-in-0", function);
    let destination = input
        .queue
        .as_ref()
        .map_or_else(|| input.destination.clone(), |queue| queue.name.clone());
    into.push(AppProperty::new(
        format!("{}.{}.destination", BINDINGS_PREFIX, binding),
        destination,
    ));
    if let Some(group) = &input.group {
        into.push(AppProperty::new(
            format!("{}.{}.group", BINDINGS_PREFIX, binding),
            group.clone(),
        ));
    }

    let Some(queue) = input.queue.as_ref().filter(|_| binder == Binder::Solace) else {
        return;
    };
    let consumer = format!("{}.{}.consumer", SOLACE_BINDINGS_PREFIX, binding);
    into.push(AppProperty::new(
        format!("{}.queueNameExpression", consumer),
        format!("'{}'", queue.name),
    ));
    if !queue.topic_subscriptions.is_empty() {
        into.push(AppProperty::new(
            format!("{}.queueAdditionalSubscriptions", consumer),
            queue.topic_subscriptions.join(","),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{Action, Payload, QueueInfo};
    use crate::type_mapping::JavaType;

    fn endpoint(destination: &str, dynamic: bool) -> Endpoint {
        Endpoint {
            channel: destination.into(),
            destination: destination.into(),
            payload: Payload::single(JavaType::Object, None),
            dynamic,
            parameters: Vec::new(),
            queue: None,
            group: None,
            operation_id: None,
            action: Action::Publish,
        }
    }

    fn handler(name: &str, kind: HandlerKind, input: Option<Endpoint>, output: Option<Endpoint>) -> Handler {
        Handler {
            name: name.into(),
            kind,
            custom_name: None,
            input,
            output,
            has_enum_parameters: false,
            send_method: None,
            summary: None,
        }
    }

    fn lines(properties: &[AppProperty]) -> Vec<String> {
        properties.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_bindings_per_handler_kind() {
        let mut queued = endpoint("orders/status/*", false);
        queued.queue = Some(QueueInfo {
            name: "status-queue".into(),
            topic_subscriptions: vec!["orders/status/created".into(), "orders/status/updated".into()],
        });
        queued.group = Some("billing".into());

        let handlers = vec![
            handler("sendOrderPlaced", HandlerKind::Send, None, Some(endpoint("orders/%s", true))),
            handler("pingSupplier", HandlerKind::Supplier, None, Some(endpoint("ping", false))),
            handler("statusQueueConsumer", HandlerKind::Consumer, Some(queued), None),
        ];

        assert_eq!(
            lines(&application_properties(&handlers, Binder::Solace)),
            vec![
                "spring.cloud.function.definition=pingSupplier;statusQueueConsumer",
                "spring.cloud.stream.bindings.pingSupplier-out-0.destination=ping",
                "spring.cloud.stream.bindings.statusQueueConsumer-in-0.destination=status-queue",
                "spring.cloud.stream.bindings.statusQueueConsumer-in-0.group=billing",
                "spring.cloud.stream.solace.bindings.statusQueueConsumer-in-0.consumer.queueNameExpression='status-queue'",
                "spring.cloud.stream.solace.bindings.statusQueueConsumer-in-0.consumer.queueAdditionalSubscriptions=orders/status/created,orders/status/updated",
                "spring.cloud.stream.default-binder=solace",
            ]
        );
    }

    #[test]
    fn test_function_gets_both_bindings() {
        let handlers = vec![handler(
            "ledgerSync",
            HandlerKind::Function,
            Some(endpoint("ledger/in", false)),
            Some(endpoint("ledger/out", false)),
        )];
        assert_eq!(
            lines(&application_properties(&handlers, Binder::Kafka)),
            vec![
                "spring.cloud.function.definition=ledgerSync",
                "spring.cloud.stream.bindings.ledgerSync-out-0.destination=ledger/out",
                "spring.cloud.stream.bindings.ledgerSync-in-0.destination=ledger/in",
                "spring.cloud.stream.default-binder=kafka",
            ]
        );
    }

    #[test]
    fn test_only_send_handlers() {
        let handlers = vec![handler("sendX", HandlerKind::Send, None, Some(endpoint("x/%s", true)))];
        assert_eq!(
            lines(&application_properties(&handlers, Binder::Rabbit)),
            vec!["spring.cloud.stream.default-binder=rabbit"]
        );
    }
}
