#![deny(missing_docs)]

//! # Contract Object Model
//!
//! Deserialization layer for AsyncAPI 2.x documents. These structs map directly
//! to the YAML/JSON objects; declaration order is preserved through `IndexMap`.
//!
//! Loading also emulates the schema-identity pass of an upstream contract parser:
//! every structural schema position without an `x-parser-schema-id` receives one,
//! either its component key or a synthetic `<anonymous-schema-N>` name.

pub mod refs;
pub mod schema;

use crate::contract::refs::extract_component_name;
use crate::contract::schema::{Dialect, ANONYMOUS_SCHEMA_PREFIX, SCHEMA_ID_KEY};
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Maximum number of `$ref` indirections followed before giving up.
const MAX_REF_HOPS: usize = 16;

/// Operation extension: explicit handler name, also the grouping key.
pub const EXT_FUNCTION_NAME: &str = "x-scs-function-name";
/// Operation extension: consumer group.
pub const EXT_GROUP: &str = "x-scs-group";
/// Operation extension: destination override.
pub const EXT_DESTINATION: &str = "x-scs-destination";
/// Info extension: package of the generated application.
pub const EXT_JAVA_PACKAGE: &str = "x-java-package";
/// Info extension: application class name.
pub const EXT_JAVA_CLASS: &str = "x-java-class";
/// Info extension: direction view (`client` / `provider`).
pub const EXT_VIEW: &str = "x-view";

/// Either a local `$ref` or an inline value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ "$ref": "#/components/..." }`
    Ref {
        /// The reference string.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// An inline object.
    Item(T),
}

/// The root document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contract {
    /// AsyncAPI version string.
    #[serde(default, deserialize_with = "lenient_text")]
    pub asyncapi: Option<String>,
    /// The info block.
    #[serde(default)]
    pub info: Info,
    /// Channels in declaration order.
    #[serde(default)]
    pub channels: IndexMap<String, Channel>,
    /// Reusable components.
    #[serde(default)]
    pub components: Components,
}

/// The info block and its document-level extensions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    /// Application title.
    #[serde(default, deserialize_with = "lenient_text_or_default")]
    pub title: String,
    /// Application version.
    #[serde(default, deserialize_with = "lenient_text_or_default")]
    pub version: String,
    /// Free text description.
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    /// Every other key, including `x-` extensions.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Info {
    /// Reads a string extension.
    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).and_then(Value::as_str)
    }
}

/// A channel: a destination pattern plus up to two operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Channel {
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Destination parameters keyed by placeholder name.
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    /// The `publish` operation.
    #[serde(default)]
    pub publish: Option<Operation>,
    /// The `subscribe` operation.
    #[serde(default)]
    pub subscribe: Option<Operation>,
}

/// An operation on a channel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// `operationId`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub operation_id: Option<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
    /// One message or a `oneOf` list of messages.
    #[serde(default)]
    pub message: Option<OperationMessage>,
    /// Protocol bindings keyed by protocol name.
    #[serde(default)]
    pub bindings: IndexMap<String, Value>,
    /// Every other key, including `x-` extensions.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    /// Reads a non-empty string extension.
    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The explicit handler name override.
    pub fn function_name_override(&self) -> Option<&str> {
        self.extension(EXT_FUNCTION_NAME)
    }

    /// The consumer group.
    pub fn group(&self) -> Option<&str> {
        self.extension(EXT_GROUP)
    }

    /// The destination override.
    pub fn destination_override(&self) -> Option<&str> {
        self.extension(EXT_DESTINATION)
    }

    /// All message entries in declaration order.
    pub fn messages(&self) -> Vec<&RefOr<Message>> {
        match &self.message {
            Some(OperationMessage::OneOf { one_of }) => one_of.iter().collect(),
            Some(OperationMessage::Single(message)) => vec![message],
            None => Vec::new(),
        }
    }
}

/// The `message` field of an operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OperationMessage {
    /// `{ oneOf: [...] }`
    OneOf {
        /// Message variants.
        #[serde(rename = "oneOf")]
        one_of: Vec<RefOr<Message>>,
    },
    /// A single message.
    Single(RefOr<Message>),
}

/// A message definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Machine name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Human title.
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Schema format of the payload (e.g. Avro MIME type).
    #[serde(default)]
    pub schema_format: Option<String>,
    /// Content type.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Payload schema.
    #[serde(default)]
    pub payload: Option<Value>,
    /// Headers schema.
    #[serde(default)]
    pub headers: Option<Value>,
    /// Every other key, including `x-` extensions.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Message {
    /// Dialect of the payload schema.
    pub fn dialect(&self) -> Dialect {
        match &self.payload {
            Some(payload) => Dialect::from_schema_format(self.schema_format.as_deref(), payload),
            None => Dialect::Structural,
        }
    }
}

/// A message resolved through its `$ref`, with the component key it was found under.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMessage<'a> {
    /// Component key when the message was referenced.
    pub key: Option<&'a str>,
    /// The message.
    pub message: &'a Message,
}

impl<'a> ResolvedMessage<'a> {
    /// Declared name: `name`, then the component key, then `title`.
    pub fn name(&self) -> Option<&'a str> {
        self.message
            .name
            .as_deref()
            .or(self.key)
            .or(self.message.title.as_deref())
            .filter(|n| !n.trim().is_empty())
    }
}

/// A channel parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Constraining schema.
    #[serde(default)]
    pub schema: Option<Value>,
    /// Runtime expression locating the value in the message.
    #[serde(default)]
    pub location: Option<String>,
}

/// Reusable components.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    /// Declared schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
    /// Declared messages.
    #[serde(default)]
    pub messages: IndexMap<String, RefOr<Message>>,
    /// Declared parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,
}

impl Contract {
    /// Parses a YAML document.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| AppError::Parse(format!("Invalid YAML contract: {}", e)))?;
        Self::from_value(value)
    }

    /// Parses a JSON document.
    pub fn from_json(text: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| AppError::Parse(format!("Invalid JSON contract: {}", e)))?;
        Self::from_value(value)
    }

    /// Builds the object model from an already parsed document.
    pub fn from_value(mut value: Value) -> AppResult<Self> {
        if !value.is_object() {
            return Err(AppError::Parse(
                "Contract root must be a mapping".to_string(),
            ));
        }
        assign_schema_ids(&mut value);
        serde_json::from_value(value)
            .map_err(|e| AppError::Parse(format!("Contract does not match the object model: {}", e)))
    }

    /// Follows a schema `$ref` to its component. Returns the component key and schema.
    ///
    /// Dangling or non-local references resolve to `None`.
    pub fn schema_by_ref(&self, reference: &str) -> Option<(&str, &Value)> {
        let mut reference = reference.to_string();
        for _ in 0..MAX_REF_HOPS {
            let name = extract_component_name(&reference, "schemas")?;
            let (key, value) = self.components.schemas.get_key_value(&name)?;
            match value.get("$ref").and_then(Value::as_str) {
                Some(next) => reference = next.to_string(),
                None => return Some((key.as_str(), value)),
            }
        }
        None
    }

    /// Returns the schema itself, or its target when it is a `$ref`.
    pub fn deref_schema<'a>(&'a self, schema: &'a Value) -> Option<&'a Value> {
        match schema.get("$ref").and_then(Value::as_str) {
            Some(reference) => self.schema_by_ref(reference).map(|(_, v)| v),
            None => Some(schema),
        }
    }

    /// Resolves a message entry.
    pub fn message<'a>(&'a self, entry: &'a RefOr<Message>) -> Option<ResolvedMessage<'a>> {
        follow(entry, "messages", &self.components.messages)
            .map(|(key, message)| ResolvedMessage { key, message })
    }

    /// Resolves a parameter entry.
    pub fn parameter<'a>(&'a self, entry: &'a RefOr<Parameter>) -> Option<&'a Parameter> {
        follow(entry, "parameters", &self.components.parameters).map(|(_, p)| p)
    }
}

fn follow<'a, T>(
    entry: &'a RefOr<T>,
    section: &str,
    registry: &'a IndexMap<String, RefOr<T>>,
) -> Option<(Option<&'a str>, &'a T)> {
    let mut current = entry;
    let mut key = None;
    for _ in 0..MAX_REF_HOPS {
        match current {
            RefOr::Item(item) => return Some((key, item)),
            RefOr::Ref { reference } => {
                let name = extract_component_name(reference, section)?;
                let (found_key, next) = registry.get_key_value(&name)?;
                key = Some(found_key.as_str());
                current = next;
            }
        }
    }
    None
}

/// Text of a scalar node. YAML reads `2.0` or `1.0` as numbers; those keep
/// their printed form. Sequences, mappings and null yield `None`.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_text_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Counter for synthetic anonymous ids.
struct IdAssigner {
    next: usize,
}

impl IdAssigner {
    fn anonymous(&mut self) -> String {
        self.next += 1;
        format!("{}{}>", ANONYMOUS_SCHEMA_PREFIX, self.next)
    }

    /// Assigns an id to `node` (when missing) and recurses into its sub-schemas.
    fn assign(&mut self, node: &mut Value, declared: Option<&str>) {
        if node.get("$ref").is_some() || Dialect::detect(node) == Dialect::Record {
            return;
        }
        let Value::Object(map) = node else {
            return;
        };
        if !map.contains_key(SCHEMA_ID_KEY) {
            let id = match declared {
                Some(name) => name.to_string(),
                None => self.anonymous(),
            };
            map.insert(SCHEMA_ID_KEY.to_string(), Value::String(id));
        }
        self.walk_children(map);
    }

    fn walk_children(&mut self, map: &mut Map<String, Value>) {
        match map.get_mut("properties") {
            Some(Value::Object(props)) => {
                for (_, prop) in props.iter_mut() {
                    self.assign(prop, None);
                }
            }
            Some(Value::Array(list)) => {
                for entry in list.iter_mut() {
                    self.assign_list_entry(entry);
                }
            }
            _ => {}
        }

        for key in ["items", "additionalProperties", "not"] {
            match map.get_mut(key) {
                Some(Value::Array(tuple)) => {
                    for item in tuple.iter_mut() {
                        self.assign(item, None);
                    }
                }
                Some(child) => self.assign(child, None),
                None => {}
            }
        }

        for key in ["allOf", "oneOf", "anyOf"] {
            if let Some(Value::Array(members)) = map.get_mut(key) {
                for member in members.iter_mut() {
                    self.assign(member, None);
                }
            }
        }
    }

    fn assign_list_entry(&mut self, entry: &mut Value) {
        let Some(map) = entry.as_object() else {
            return;
        };
        let named = map.contains_key("name");
        let has_schema = map.contains_key("schema");
        let single_pair = map.len() == 1;

        if named && has_schema {
            if let Some(schema) = entry.get_mut("schema") {
                self.assign(schema, None);
            }
        } else if named {
            self.assign(entry, None);
        } else if single_pair {
            if let Some((_, schema)) = entry.as_object_mut().and_then(|m| m.iter_mut().next()) {
                self.assign(schema, None);
            }
        }
    }

    fn assign_message(&mut self, message: &mut Value) {
        let is_record = message
            .get("schemaFormat")
            .and_then(Value::as_str)
            .is_some_and(|f| f.to_ascii_lowercase().contains("avro"));
        if is_record || message.get("$ref").is_some() {
            return;
        }
        if let Some(payload) = message.get_mut("payload") {
            self.assign(payload, None);
        }
    }

    fn assign_parameters(&mut self, parameters: Option<&mut Value>) {
        if let Some(Value::Object(params)) = parameters {
            for (_, param) in params.iter_mut() {
                if let Some(schema) = param.get_mut("schema") {
                    self.assign(schema, None);
                }
            }
        }
    }
}

/// Gives every structural schema position an `x-parser-schema-id`.
///
/// Order: component schemas, component messages, channel messages and
/// parameters, component parameters.
fn assign_schema_ids(root: &mut Value) {
    let mut ids = IdAssigner { next: 0 };

    if let Some(Value::Object(schemas)) = root.pointer_mut("/components/schemas") {
        for (key, schema) in schemas.iter_mut() {
            ids.assign(schema, Some(key));
        }
    }

    if let Some(Value::Object(messages)) = root.pointer_mut("/components/messages") {
        for (_, message) in messages.iter_mut() {
            ids.assign_message(message);
        }
    }

    if let Some(Value::Object(channels)) = root.get_mut("channels") {
        for (_, channel) in channels.iter_mut() {
            for action in ["publish", "subscribe"] {
                let Some(message) = channel.pointer_mut(&format!("/{}/message", action)) else {
                    continue;
                };
                match message.get_mut("oneOf") {
                    Some(Value::Array(variants)) => {
                        for variant in variants.iter_mut() {
                            ids.assign_message(variant);
                        }
                    }
                    _ => ids.assign_message(message),
                }
            }
            ids.assign_parameters(channel.get_mut("parameters"));
        }
    }

    ids.assign_parameters(root.pointer_mut("/components/parameters"));
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = r#"
asyncapi: 2.6.0
info:
  title: Orders
  version: 1.0.0
  x-java-package: com.acme.orders
channels:
  orders/{region}:
    parameters:
      region:
        schema:
          type: string
    publish:
      operationId: publish
      message:
        $ref: '#/components/messages/OrderPlaced'
  orders/status:
    subscribe:
      x-scs-function-name: statusSync
      message:
        oneOf:
          - $ref: '#/components/messages/OrderPlaced'
          - name: OrderCancelled
            payload:
              type: object
              properties:
                reason:
                  type: string
components:
  messages:
    OrderPlaced:
      payload:
        $ref: '#/components/schemas/Order'
  schemas:
    Order:
      type: object
      properties:
        id:
          type: string
        lines:
          type: array
          items:
            type: object
            properties:
              sku:
                type: string
    Alias:
      $ref: '#/components/schemas/Order'
"#;

    #[test]
    fn test_parse_preserves_order_and_extensions() {
        let contract = Contract::from_yaml(CONTRACT).unwrap();
        let names: Vec<_> = contract.channels.keys().cloned().collect();
        assert_eq!(names, vec!["orders/{region}", "orders/status"]);
        assert_eq!(contract.info.title, "Orders");
        assert_eq!(
            contract.info.extension(EXT_JAVA_PACKAGE),
            Some("com.acme.orders")
        );

        let status = &contract.channels["orders/status"];
        let op = status.subscribe.as_ref().unwrap();
        assert_eq!(op.function_name_override(), Some("statusSync"));
        assert_eq!(op.messages().len(), 2);
    }

    #[test]
    fn test_schema_ids_assigned() {
        let contract = Contract::from_yaml(CONTRACT).unwrap();
        let order = &contract.components.schemas["Order"];
        assert_eq!(order[SCHEMA_ID_KEY], "Order");
        assert_eq!(
            order["properties"]["id"][SCHEMA_ID_KEY],
            "<anonymous-schema-1>"
        );
        assert_eq!(
            order["properties"]["lines"]["items"][SCHEMA_ID_KEY],
            "<anonymous-schema-3>"
        );
        // A `$ref` node is never stamped.
        assert!(contract.components.schemas["Alias"]
            .get(SCHEMA_ID_KEY)
            .is_none());
    }

    #[test]
    fn test_message_resolution() {
        let contract = Contract::from_yaml(CONTRACT).unwrap();
        let op = contract.channels["orders/{region}"].publish.as_ref().unwrap();
        let entry = op.messages()[0];
        let resolved = contract.message(entry).unwrap();
        assert_eq!(resolved.key, Some("OrderPlaced"));
        assert_eq!(resolved.name(), Some("OrderPlaced"));

        let inline = contract.channels["orders/status"]
            .subscribe
            .as_ref()
            .unwrap()
            .messages()[1];
        let resolved = contract.message(inline).unwrap();
        assert_eq!(resolved.key, None);
        assert_eq!(resolved.name(), Some("OrderCancelled"));
        let payload = resolved.message.payload.as_ref().unwrap();
        assert!(payload[SCHEMA_ID_KEY]
            .as_str()
            .unwrap()
            .starts_with("<anonymous-schema-"));
    }

    #[test]
    fn test_schema_refs_follow_chains() {
        let contract = Contract::from_yaml(CONTRACT).unwrap();
        let (key, _) = contract
            .schema_by_ref("#/components/schemas/Alias")
            .unwrap();
        assert_eq!(key, "Order");
        assert!(contract
            .schema_by_ref("#/components/schemas/Missing")
            .is_none());
    }

    #[test]
    fn test_ref_cycle_terminates() {
        let yaml = r#"
components:
  schemas:
    A:
      $ref: '#/components/schemas/B'
    B:
      $ref: '#/components/schemas/A'
"#;
        let contract = Contract::from_yaml(yaml).unwrap();
        assert!(contract.schema_by_ref("#/components/schemas/A").is_none());
    }

    #[test]
    fn test_parameter_resolution() {
        let yaml = r#"
channels:
  orders/{region}:
    parameters:
      region:
        $ref: '#/components/parameters/Region'
components:
  parameters:
    Region:
      description: Sales region
      schema:
        type: string
        enum: [emea, apac]
"#;
        let contract = Contract::from_yaml(yaml).unwrap();
        let entry = &contract.channels["orders/{region}"].parameters["region"];
        let param = contract.parameter(entry).unwrap();
        assert_eq!(param.description.as_deref(), Some("Sales region"));
        assert!(param.schema.as_ref().unwrap()[SCHEMA_ID_KEY]
            .as_str()
            .unwrap()
            .starts_with("<anonymous-schema-"));
    }

    #[test]
    fn test_avro_payload_left_untouched() {
        let yaml = r#"
channels:
  ledger:
    publish:
      message:
        schemaFormat: application/vnd.apache.avro;version=1.9.0
        payload:
          type: record
          name: Entry
          fields:
            - name: amount
              type: double
"#;
        let contract = Contract::from_yaml(yaml).unwrap();
        let op = contract.channels["ledger"].publish.as_ref().unwrap();
        let message = contract.message(op.messages()[0]).unwrap().message;
        assert_eq!(message.dialect(), Dialect::Record);
        assert!(message.payload.as_ref().unwrap().get(SCHEMA_ID_KEY).is_none());
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            Contract::from_yaml("channels: ["),
            Err(AppError::Parse(_))
        ));
        assert!(matches!(
            Contract::from_json("[1, 2]"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_numeric_scalars_read_as_text() {
        let contract = Contract::from_yaml(
            "asyncapi: 2.0\ninfo:\n  title: T\n  version: 1.0\nchannels:\n  orders:\n    publish:\n      operationId: 42\n      message:\n        name: [not, a, name]\n",
        )
        .unwrap();
        assert_eq!(contract.asyncapi.as_deref(), Some("2.0"));
        assert_eq!(contract.info.title, "T");
        assert_eq!(contract.info.version, "1.0");

        let op = contract.channels["orders"].publish.as_ref().unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("42"));
        let message = contract.message(op.messages()[0]).unwrap().message;
        assert_eq!(message.name, None);
    }
}
