#![deny(missing_docs)]

//! # Handler Models
//!
//! Handler records produced by the classifier and reshaped by the consolidation
//! passes. Every type serializes in camelCase for the printers.

use crate::type_mapping::JavaType;
use serde::Serialize;
use std::fmt::{self, Display};

/// The four handler archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HandlerKind {
    /// Emits messages to a fixed destination.
    Supplier,
    /// Receives messages.
    Consumer,
    /// Receives and emits: one input binding, one output binding.
    Function,
    /// Publishes on demand to a parameterized destination.
    Send,
}

impl HandlerKind {
    /// True for the producing archetypes.
    pub fn is_producer(self) -> bool {
        matches!(self, HandlerKind::Supplier | HandlerKind::Send)
    }
}

impl Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKind::Supplier => write!(f, "Supplier"),
            HandlerKind::Consumer => write!(f, "Consumer"),
            HandlerKind::Function => write!(f, "Function"),
            HandlerKind::Send => write!(f, "Send"),
        }
    }
}

/// The contract operation an endpoint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// `publish`
    Publish,
    /// `subscribe`
    Subscribe,
}

/// A destination parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelParameter {
    /// Placeholder name.
    pub name: String,
    /// Escaped identifier.
    pub identifier: String,
    /// Semantic type.
    #[serde(rename = "type")]
    pub ty: JavaType,
    /// Rendered type.
    pub type_name: String,
    /// Destination parameters are always required.
    pub required: bool,
    /// Index of the path segment holding the placeholder.
    pub position: usize,
    /// Literal set when the parameter schema is an enum.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// True when `enum_values` is non-empty.
    pub has_enum: bool,
    /// Documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A durable queue and the topic patterns bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueInfo {
    /// Queue name.
    pub name: String,
    /// Topic subscriptions in declaration order.
    pub topic_subscriptions: Vec<String>,
}

/// The payload carried through one binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Semantic type.
    #[serde(rename = "type")]
    pub ty: JavaType,
    /// Rendered type.
    pub type_name: String,
    /// Distinct message names observed on this binding.
    pub message_names: Vec<String>,
    /// Concrete payload types, parallel to `message_names`.
    pub payload_types: Vec<String>,
    /// Semantic form of `payload_types`.
    #[serde(skip)]
    pub variant_types: Vec<JavaType>,
    /// Doc comment listing the possible payload types when there are several.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_message_comment: Option<String>,
}

impl Payload {
    /// A single-type payload.
    pub fn single(ty: JavaType, message_name: Option<String>) -> Self {
        let type_name = ty.to_string();
        Self {
            payload_types: message_name.iter().map(|_| type_name.clone()).collect(),
            variant_types: message_name.iter().map(|_| ty.clone()).collect(),
            message_names: message_name.into_iter().collect(),
            type_name,
            ty,
            multi_message_comment: None,
        }
    }

    /// An enveloped payload for several message variants.
    ///
    /// Variants are deduplicated by message name; when a single one remains the
    /// payload keeps its concrete type.
    pub fn multi(variants: Vec<(String, JavaType)>) -> Self {
        let mut payload = Self {
            ty: JavaType::Message,
            type_name: JavaType::Message.to_string(),
            message_names: Vec::new(),
            payload_types: Vec::new(),
            variant_types: Vec::new(),
            multi_message_comment: None,
        };
        for (name, ty) in variants {
            payload.push_variant(name, ty);
        }
        if !payload.is_multi() {
            let name = payload.message_names.pop();
            let ty = payload.variant_types.pop().unwrap_or(JavaType::Object);
            return Self::single(ty, name);
        }
        payload.refresh_envelope();
        payload
    }

    /// True when several message variants share this binding.
    pub fn is_multi(&self) -> bool {
        self.message_names.len() > 1
    }

    /// Appends the variants of `other` that are not yet present.
    pub fn absorb(&mut self, other: &Payload) {
        for (name, ty) in other.message_names.iter().zip(&other.variant_types) {
            self.push_variant(name.clone(), ty.clone());
        }
        self.refresh_envelope();
    }

    fn push_variant(&mut self, name: String, ty: JavaType) {
        if !self.message_names.contains(&name) {
            self.message_names.push(name);
            self.payload_types.push(ty.to_string());
            self.variant_types.push(ty);
        }
    }

    /// Forces the enveloped type and regenerates the comment once more than one
    /// variant is present.
    fn refresh_envelope(&mut self) {
        if !self.is_multi() {
            return;
        }
        self.ty = JavaType::Message;
        self.type_name = JavaType::Message.to_string();
        let entries: Vec<String> = self
            .message_names
            .iter()
            .zip(&self.payload_types)
            .map(|(name, ty)| {
                if name == ty {
                    name.clone()
                } else {
                    format!("{} ({})", name, ty)
                }
            })
            .collect();
        self.multi_message_comment = Some(format!(
            "The payload is one of the following types: {}. Inspect the message to tell them apart.",
            entries.join(", ")
        ));
    }
}

/// One binding of a handler: the channel side it reads from or writes to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Channel name as declared.
    pub channel: String,
    /// Destination: a printf template for Send, a wildcard pattern for consumers,
    /// the literal destination otherwise.
    pub destination: String,
    /// Payload.
    pub payload: Payload,
    /// True when the destination carries parameters.
    pub dynamic: bool,
    /// Destination parameters ordered by position.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ChannelParameter>,
    /// Durable queue binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueInfo>,
    /// Consumer group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Contract operation id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Contract action the endpoint came from.
    pub action: Action,
}

/// One argument of a generated send method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodArg {
    /// Identifier.
    pub name: String,
    /// Rendered type.
    pub type_name: String,
}

/// Invocation signature of a Send handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMethod {
    /// Method name.
    pub name: String,
    /// Payload first, then destination parameters in position order.
    pub args: Vec<MethodArg>,
    /// Argument list as source text, e.g. `OrderPlaced payload, String region`.
    pub signature: String,
    /// Identifiers passed to the destination template, in placeholder order.
    pub destination_args: Vec<String>,
}

/// A generated message handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    /// Handler (bean or method) name.
    pub name: String,
    /// Archetype.
    pub kind: HandlerKind,
    /// Explicit name override the handler was declared with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    /// Consuming side (Consumer, Function).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Endpoint>,
    /// Producing side (Supplier, Send, Function).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Endpoint>,
    /// True when a destination parameter is an enum.
    pub has_enum_parameters: bool,
    /// Invocation signature (Send only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_method: Option<SendMethod>,
    /// Operation summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Handler {
    /// The endpoint this handler is keyed by: output for producers, input otherwise.
    pub fn primary_endpoint(&self) -> Option<&Endpoint> {
        if self.kind.is_producer() {
            self.output.as_ref()
        } else {
            self.input.as_ref()
        }
    }

    /// Mutable access to [`Handler::primary_endpoint`].
    pub fn primary_endpoint_mut(&mut self) -> Option<&mut Endpoint> {
        if self.kind.is_producer() {
            self.output.as_mut()
        } else {
            self.input.as_mut()
        }
    }

    /// Destination parameters of every endpoint.
    pub fn parameters(&self) -> impl Iterator<Item = &ChannelParameter> {
        self.input
            .iter()
            .chain(self.output.iter())
            .flat_map(|endpoint| endpoint.parameters.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> JavaType {
        JavaType::Class {
            name: name.into(),
            namespace: None,
        }
    }

    #[test]
    fn test_single_payload() {
        let payload = Payload::single(class("OrderPlaced"), Some("OrderPlaced".into()));
        assert_eq!(payload.type_name, "OrderPlaced");
        assert!(!payload.is_multi());
        assert!(payload.multi_message_comment.is_none());
    }

    #[test]
    fn test_absorb_forces_envelope() {
        let mut payload = Payload::single(class("OrderPlaced"), Some("OrderPlaced".into()));
        payload.absorb(&Payload::single(class("OrderPlaced"), Some("OrderPlaced".into())));
        assert!(!payload.is_multi());
        assert_eq!(payload.type_name, "OrderPlaced");

        payload.absorb(&Payload::single(class("Cancellation"), Some("OrderCancelled".into())));
        assert!(payload.is_multi());
        assert_eq!(payload.ty, JavaType::Message);
        assert_eq!(payload.type_name, "Message<?>");
        let comment = payload.multi_message_comment.unwrap();
        assert!(comment.contains("OrderPlaced, OrderCancelled (Cancellation)"));
    }

    #[test]
    fn test_multi_payload() {
        let payload = Payload::multi(vec![("A".into(), class("A")), ("B".into(), class("B"))]);
        assert_eq!(payload.message_names, vec!["A", "B"]);
        assert_eq!(payload.ty, JavaType::Message);
    }

    #[test]
    fn test_multi_with_one_distinct_variant_stays_concrete() {
        let payload = Payload::multi(vec![
            ("Order".into(), class("Order")),
            ("Order".into(), class("Order")),
        ]);
        assert!(!payload.is_multi());
        assert_eq!(payload.type_name, "Order");
        assert_eq!(payload.message_names, vec!["Order"]);
        assert_eq!(payload.payload_types, vec!["Order"]);
        assert!(payload.multi_message_comment.is_none());

        let empty = Payload::multi(Vec::new());
        assert_eq!(empty.ty, JavaType::Object);
        assert!(empty.message_names.is_empty());
    }

    #[test]
    fn test_kind_direction() {
        assert!(HandlerKind::Supplier.is_producer());
        assert!(HandlerKind::Send.is_producer());
        assert!(!HandlerKind::Consumer.is_producer());
        assert!(!HandlerKind::Function.is_producer());
    }
}
