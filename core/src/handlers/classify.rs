//! # Channel/Operation Classifier
//!
//! Walks the channels in declaration order. Per channel the producing operation
//! (as decided by the view) is classified before the consuming one:
//!
//! - producer with destination parameters: **Send**, otherwise **Supplier**;
//! - consumer: one **Consumer** per durable queue bound to it, or a single
//!   **Consumer** when there is none. Consumer destinations are wildcarded.

use crate::contract::{Channel, Message, Operation, ResolvedMessage};
use crate::handlers::bindings::solace_queues;
use crate::handlers::models::{Action, ChannelParameter, Endpoint, Handler, HandlerKind, Payload, QueueInfo};
use crate::handlers::naming::{handler_name, NameSources};
use crate::handlers::params::{extract_parameters, format_template, send_method, wildcard_destination};
use crate::options::{Binder, View};
use crate::schemas::{ResolverContext, SchemaBuilder};
use crate::type_mapping::JavaType;

/// Classifies every channel operation of one contract into raw handlers.
pub struct Classifier<'r, 'c> {
    ctx: &'r ResolverContext<'c>,
    builder: SchemaBuilder<'r, 'c>,
    view: View,
    binder: Binder,
}

/// What an operation contributes regardless of its archetype.
struct OperationFacts {
    pattern: String,
    parameters: Vec<ChannelParameter>,
    payload: Payload,
}

impl OperationFacts {
    fn has_enum_parameters(&self) -> bool {
        self.parameters.iter().any(|p| p.has_enum)
    }

    fn single_message_name(&self) -> Option<&str> {
        match self.payload.message_names.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

impl<'r, 'c> Classifier<'r, 'c> {
    /// A classifier for one contract under a view and binder.
    pub fn new(ctx: &'r ResolverContext<'c>, view: View, binder: Binder) -> Self {
        Self {
            ctx,
            builder: SchemaBuilder::new(ctx),
            view,
            binder,
        }
    }

    /// Raw handlers, in channel order, producer before consumer.
    pub fn classify(mut self) -> Vec<Handler> {
        let contract = self.ctx.contract();
        let mut handlers = Vec::new();

        for (channel_name, channel) in &contract.channels {
            let publish = channel.publish.as_ref().map(|op| (op, Action::Publish));
            let subscribe = channel.subscribe.as_ref().map(|op| (op, Action::Subscribe));
            let (producer, consumer) = if self.view.publish_is_producer() {
                (publish, subscribe)
            } else {
                (subscribe, publish)
            };

            if let Some((operation, action)) = producer {
                handlers.push(self.producer(channel_name, channel, operation, action));
            }
            if let Some((operation, action)) = consumer {
                handlers.extend(self.consumers(channel_name, channel, operation, action));
            }
        }

        tracing::debug!(count = handlers.len(), view = %self.view, "raw handlers classified");
        handlers
    }

    fn facts(&mut self, channel_name: &'c str, channel: &'c Channel, operation: &'c Operation) -> OperationFacts {
        let pattern = operation.destination_override().unwrap_or(channel_name);
        let parameters = extract_parameters(self.ctx.contract(), &mut self.builder, pattern, channel);
        let payload = self.payload(operation);
        OperationFacts {
            pattern: pattern.to_string(),
            parameters,
            payload,
        }
    }

    fn payload(&mut self, operation: &'c Operation) -> Payload {
        let contract = self.ctx.contract();
        let messages: Vec<ResolvedMessage<'c>> = operation
            .messages()
            .into_iter()
            .filter_map(|entry| contract.message(entry))
            .collect();

        let mut variants: Vec<(String, JavaType)> = Vec::with_capacity(messages.len());
        for message in &messages {
            let ty = self.message_type(message);
            let name = message
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| ty.to_string());
            variants.push((name, ty));
        }

        match variants.len() {
            0 => Payload::single(JavaType::Object, None),
            1 => {
                let (name, ty) = variants.remove(0);
                Payload::single(ty, Some(name))
            }
            _ => Payload::multi(variants),
        }
    }

    fn message_type(&mut self, message: &ResolvedMessage<'c>) -> JavaType {
        let declared: &'c Message = message.message;
        if let Some(info) = self.ctx.payload_class(declared) {
            return info.java_type();
        }
        match declared.payload.as_ref() {
            Some(payload) => self.builder.resolve_type(
                message.name().unwrap_or("payload"),
                payload,
                declared.dialect(),
                None,
            ),
            None => JavaType::Object,
        }
    }

    fn producer(
        &mut self,
        channel_name: &'c str,
        channel: &'c Channel,
        operation: &'c Operation,
        action: Action,
    ) -> Handler {
        let facts = self.facts(channel_name, channel, operation);
        let dynamic = !facts.parameters.is_empty();
        let kind = if dynamic {
            HandlerKind::Send
        } else {
            HandlerKind::Supplier
        };

        let name = handler_name(
            &NameSources {
                custom: operation.function_name_override(),
                operation_id: operation.operation_id.as_deref(),
                queue: None,
                message: facts.single_message_name(),
                channel: channel_name,
            },
            kind,
        );
        let destination = if dynamic {
            format_template(&facts.pattern, &facts.parameters)
        } else {
            facts.pattern.clone()
        };
        let send = dynamic.then(|| send_method(&name, &facts.pattern, &facts.payload, &facts.parameters));
        let has_enum_parameters = facts.has_enum_parameters();

        Handler {
            name,
            kind,
            custom_name: operation.function_name_override().map(str::to_string),
            input: None,
            output: Some(Endpoint {
                channel: channel_name.to_string(),
                destination,
                payload: facts.payload,
                dynamic,
                parameters: facts.parameters,
                queue: None,
                group: None,
                operation_id: operation.operation_id.clone(),
                action,
            }),
            has_enum_parameters,
            send_method: send,
            summary: operation.summary.clone(),
        }
    }

    fn consumers(
        &mut self,
        channel_name: &'c str,
        channel: &'c Channel,
        operation: &'c Operation,
        action: Action,
    ) -> Vec<Handler> {
        let facts = self.facts(channel_name, channel, operation);
        let destination = wildcard_destination(&facts.pattern);

        let queues = match self.binder {
            Binder::Solace => solace_queues(operation),
            _ => {
                if !solace_queues(operation).is_empty() {
                    tracing::debug!(channel = channel_name, binder = %self.binder, "Queue bindings ignored for this binder");
                }
                Vec::new()
            }
        };

        if queues.is_empty() {
            return vec![self.consumer(channel_name, operation, action, &facts, &destination, None)];
        }
        queues
            .into_iter()
            .map(|mut queue| {
                if queue.topic_subscriptions.is_empty() {
                    queue.topic_subscriptions.push(destination.clone());
                }
                self.consumer(channel_name, operation, action, &facts, &destination, Some(queue))
            })
            .collect()
    }

    fn consumer(
        &self,
        channel_name: &str,
        operation: &Operation,
        action: Action,
        facts: &OperationFacts,
        destination: &str,
        queue: Option<QueueInfo>,
    ) -> Handler {
        let name = handler_name(
            &NameSources {
                custom: operation.function_name_override(),
                operation_id: operation.operation_id.as_deref(),
                queue: queue.as_ref().map(|q| q.name.as_str()),
                message: facts.single_message_name(),
                channel: channel_name,
            },
            HandlerKind::Consumer,
        );

        Handler {
            name,
            kind: HandlerKind::Consumer,
            custom_name: operation.function_name_override().map(str::to_string),
            input: Some(Endpoint {
                channel: channel_name.to_string(),
                destination: destination.to_string(),
                payload: facts.payload.clone(),
                dynamic: !facts.parameters.is_empty(),
                parameters: facts.parameters.clone(),
                queue,
                group: operation.group().map(str::to_string),
                operation_id: operation.operation_id.clone(),
                action,
            }),
            output: None,
            has_enum_parameters: facts.has_enum_parameters(),
            send_method: None,
            summary: operation.summary.clone(),
        }
    }
}
