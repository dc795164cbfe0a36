#![deny(missing_docs)]

//! # Resolver Context
//!
//! The per-contract class registry. Built once from a [`Contract`] and threaded
//! through every resolution call; there is no process-wide state.
//!
//! Registration order:
//! 1. component schemas (both dialects),
//! 2. message payloads (inline structural payloads are named after their message,
//!    record-dialect named types are registered recursively),
//! 3. `allOf` inheritance edges.

use crate::contract::refs::{extract_component_name, is_numeric_key, recover_declared_name};
use crate::contract::schema::{is_anonymous_name, Dialect, SchemaView};
use crate::contract::{Contract, Message, ResolvedMessage};
use crate::naming::to_type_name;
use crate::schemas::class_info::{ModelClassInfo, PLACEHOLDER_CLASS_NAME};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// Maximum alias indirections followed.
const MAX_ALIAS_HOPS: usize = 16;

/// A schema registered as a top-level class.
#[derive(Debug, Clone)]
pub struct RegisteredSchema<'c> {
    /// Naming metadata.
    pub info: ModelClassInfo,
    /// The schema node the class is built from.
    pub schema: &'c Value,
    /// The anonymous `allOf` member carrying this class's own properties, when the
    /// class extends a base.
    pub extension: Option<&'c Value>,
}

/// Per-contract registry of classes, aliases and inheritance edges.
#[derive(Debug)]
pub struct ResolverContext<'c> {
    contract: &'c Contract,
    classes: IndexMap<String, RegisteredSchema<'c>>,
    aliases: HashMap<String, String>,
}

impl<'c> ResolverContext<'c> {
    /// Builds the registry for one contract.
    pub fn build(contract: &'c Contract) -> Self {
        let mut ctx = Self {
            contract,
            classes: IndexMap::new(),
            aliases: HashMap::new(),
        };
        ctx.register_components();
        ctx.register_payloads();
        ctx.link_compositions();
        tracing::debug!(
            classes = ctx.classes.len(),
            aliases = ctx.aliases.len(),
            "schema registry built"
        );
        ctx
    }

    /// The contract this context was built for.
    pub fn contract(&self) -> &'c Contract {
        self.contract
    }

    /// Registered classes in registration order.
    pub fn registered(&self) -> impl Iterator<Item = (&str, &RegisteredSchema<'c>)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Follows aliases to the canonical key.
    pub fn canonical_key<'s>(&'s self, key: &'s str) -> &'s str {
        let mut current = key;
        for _ in 0..MAX_ALIAS_HOPS {
            match self.aliases.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Looks up a registered schema by key or alias.
    pub fn lookup(&self, key: &str) -> Option<&RegisteredSchema<'c>> {
        self.classes.get(self.canonical_key(key))
    }

    /// Class metadata by key or alias.
    pub fn class_info(&self, key: &str) -> Option<&ModelClassInfo> {
        self.lookup(key).map(|entry| &entry.info)
    }

    /// Canonical registered key a schema `$ref` points to.
    pub fn registered_key_for_ref(&self, reference: &str) -> Option<String> {
        let name = extract_component_name(reference, "schemas")?;
        let direct = self.canonical_key(&name);
        if self.classes.contains_key(direct) {
            return Some(direct.to_string());
        }
        let (target, _) = self.contract.schema_by_ref(reference)?;
        let key = self.canonical_key(target);
        self.classes.contains_key(key).then(|| key.to_string())
    }

    /// Class metadata a schema `$ref` points to.
    pub fn class_for_ref(&self, reference: &str) -> Option<&ModelClassInfo> {
        let key = self.registered_key_for_ref(reference)?;
        self.class_info(&key)
    }

    /// Class metadata for a schema node: via its `$ref`, else via its identity.
    pub fn class_for_node(&self, node: &Value) -> Option<&ModelClassInfo> {
        if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
            return self.class_for_ref(reference);
        }
        self.class_info(SchemaView::new(node).id()?)
    }

    /// Record-dialect named type lookup: full name, then namespace-qualified,
    /// then simple name.
    pub fn record_class(&self, name: &str, namespace: Option<&str>) -> Option<&ModelClassInfo> {
        let qualified = match (name.contains('.'), namespace) {
            (false, Some(ns)) => format!("{}.{}", ns, name),
            _ => name.to_string(),
        };
        self.class_info(&qualified).or_else(|| {
            let simple = name.rsplit('.').next()?;
            self.classes
                .values()
                .find(|e| e.info.dialect == Dialect::Record && e.info.original_name == simple)
                .map(|e| &e.info)
        })
    }

    /// The class a message's payload resolves to, when it is a registered class.
    pub fn payload_class(&self, message: &Message) -> Option<&ModelClassInfo> {
        let payload = message.payload.as_ref()?;
        if let Some(reference) = payload.get("$ref").and_then(Value::as_str) {
            return self.class_for_ref(reference);
        }
        match message.dialect() {
            Dialect::Record => match payload {
                Value::String(name) => self.record_class(name, None),
                _ => {
                    let (ns, name) = SchemaView::new(payload).record_name()?;
                    self.record_class(name, ns)
                }
            },
            Dialect::Structural => self.class_info(SchemaView::new(payload).id()?),
        }
    }

    fn insert(&mut self, key: String, info: ModelClassInfo, schema: &'c Value) {
        if self.classes.contains_key(&key) || self.aliases.contains_key(&key) {
            return;
        }
        let duplicate = self.classes.iter().find(|(_, e)| {
            e.info.class_name == info.class_name && e.info.namespace == info.namespace
        });
        if let Some((existing, _)) = duplicate {
            tracing::warn!(
                schema = %key,
                class = %info.class_name,
                existing = %existing,
                "Duplicate class name; aliasing to the first declaration"
            );
            self.aliases.insert(key, existing.clone());
            return;
        }
        self.classes.insert(
            key,
            RegisteredSchema {
                info,
                schema,
                extension: None,
            },
        );
    }

    fn register_components(&mut self) {
        let contract = self.contract;
        for (key, schema) in &contract.components.schemas {
            if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
                if let Some((target, _)) = contract.schema_by_ref(reference) {
                    if target != key {
                        self.aliases.insert(key.clone(), target.to_string());
                    }
                }
                continue;
            }
            match Dialect::detect(schema) {
                Dialect::Record => {
                    if let Some(full_name) = self.register_record(schema, None) {
                        if full_name != *key {
                            self.aliases.insert(key.clone(), full_name);
                        }
                    }
                }
                Dialect::Structural => self.register_structural(key, schema),
            }
        }
    }

    fn register_structural(&mut self, key: &str, schema: &'c Value) {
        let view = SchemaView::new(schema);
        if !view.is_object_like() && !view.is_enum() {
            // Aliases of primitives and arrays are inlined where they are used.
            return;
        }

        let raw = view.id().filter(|id| !is_anonymous_name(id)).unwrap_or(key);
        let declared = recover_declared_name(raw);
        if is_numeric_key(&declared) {
            tracing::debug!(schema = %key, "Dropping numerically keyed schema as a positional duplicate");
            return;
        }

        let class_name = class_name_or_placeholder(&declared, key);
        let mut info = ModelClassInfo::standalone(declared, class_name, None, Dialect::Structural);
        info.is_enum = view.is_enum() && !view.is_object_like();
        self.insert(key.to_string(), info, schema);
    }

    /// Registers every named type declared inside a record-dialect schema.
    /// Returns the key of the type `schema` itself declares.
    fn register_record(&mut self, schema: &'c Value, enclosing_ns: Option<&str>) -> Option<String> {
        match schema {
            Value::Array(branches) => {
                for branch in branches {
                    self.register_record(branch, enclosing_ns);
                }
                None
            }
            Value::Object(map) => {
                let view = SchemaView::new(schema);
                match map.get("type") {
                    Some(Value::String(kind))
                        if matches!(kind.as_str(), "record" | "error" | "enum") =>
                    {
                        let Some((ns, name)) = view.record_name() else {
                            tracing::warn!("Record-dialect {} without a name is ignored", kind);
                            return None;
                        };
                        let namespace = ns.or(enclosing_ns).map(str::to_string);
                        let key = match &namespace {
                            Some(ns) => format!("{}.{}", ns, name),
                            None => name.to_string(),
                        };

                        let class_name = class_name_or_placeholder(name, &key);
                        let mut info = ModelClassInfo::standalone(
                            name,
                            class_name,
                            namespace.clone(),
                            Dialect::Record,
                        );
                        info.is_enum = kind == "enum";
                        self.insert(key.clone(), info, schema);

                        if kind != "enum" {
                            for field in view.properties() {
                                self.register_record(field.schema, namespace.as_deref());
                            }
                        }
                        Some(key)
                    }
                    Some(Value::String(kind)) if kind == "array" => {
                        if let Some(items) = view.items() {
                            self.register_record(items, enclosing_ns);
                        }
                        None
                    }
                    Some(Value::String(kind)) if kind == "map" => {
                        if let Some(values) = view.map_values() {
                            self.register_record(values, enclosing_ns);
                        }
                        None
                    }
                    Some(nested @ (Value::Object(_) | Value::Array(_))) => {
                        self.register_record(nested, enclosing_ns)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn register_payloads(&mut self) {
        let contract = self.contract;
        let component_messages = contract
            .components
            .messages
            .values()
            .filter_map(|entry| contract.message(entry));
        let channel_messages = contract
            .channels
            .values()
            .flat_map(|channel| channel.publish.iter().chain(channel.subscribe.iter()))
            .flat_map(|operation| operation.messages())
            .filter_map(|entry| contract.message(entry));

        for message in component_messages.chain(channel_messages) {
            self.register_payload(message);
        }
    }

    fn register_payload(&mut self, resolved: ResolvedMessage<'c>) {
        let Some(payload) = resolved.message.payload.as_ref() else {
            return;
        };
        if payload.get("$ref").is_some() {
            return;
        }
        if resolved.message.dialect() == Dialect::Record {
            self.register_record(payload, None);
            return;
        }

        let view = SchemaView::new(payload);
        if !view.is_object_like() && !view.is_enum() {
            return;
        }
        let Some(id) = view.id() else {
            return;
        };

        let declared = if view.is_anonymous() {
            // Inline payloads take the name of the message that carries them.
            resolved.name().map(str::to_string)
        } else {
            Some(recover_declared_name(id))
        };
        let declared = declared.unwrap_or_else(|| id.to_string());
        let class_name = class_name_or_placeholder(&declared, id);
        let mut info = ModelClassInfo::standalone(declared, class_name, None, Dialect::Structural);
        info.is_enum = view.is_enum() && !view.is_object_like();
        self.insert(id.to_string(), info, payload);
    }

    fn link_compositions(&mut self) {
        let keys: Vec<String> = self.classes.keys().cloned().collect();
        for key in keys {
            let Some(entry) = self.classes.get(&key) else {
                continue;
            };
            if entry.info.dialect != Dialect::Structural {
                continue;
            }
            let members = SchemaView::new(entry.schema).all_of();
            if members.is_empty() {
                continue;
            }

            let Some((base_key, extension)) = self.split_composition(members) else {
                tracing::warn!(
                    schema = %key,
                    members = members.len(),
                    "allOf does not pair one named base with one anonymous extension; no superclass"
                );
                continue;
            };
            if self.canonical_key(&base_key) == key {
                tracing::warn!(schema = %key, "allOf base refers to the schema itself; no superclass");
                continue;
            }

            let base_name = self.class_info(&base_key).map(|info| info.class_name.clone());
            let extension_id = SchemaView::new(extension).id().map(str::to_string);
            if let Some(entry) = self.classes.get_mut(&key) {
                entry.info.super_class = base_name;
                entry.extension = Some(extension);
            }
            if let Some(anonymous) = extension_id {
                self.aliases.insert(anonymous, key.clone());
            }
        }
    }

    /// Splits a two-member `allOf` into (named base key, anonymous extension).
    fn split_composition(&self, members: &'c [Value]) -> Option<(String, &'c Value)> {
        let [first, second] = members else {
            return None;
        };
        let mut base = None;
        let mut extension = None;

        for member in [first, second] {
            let named_key = match member.get("$ref").and_then(Value::as_str) {
                Some(reference) => Some(self.registered_key_for_ref(reference)?),
                None => {
                    let view = SchemaView::new(member);
                    if view.is_anonymous() {
                        None
                    } else {
                        let id = view.id()?;
                        self.classes.contains_key(id).then(|| id.to_string())
                    }
                }
            };
            match named_key {
                Some(key) if base.is_none() => base = Some(key),
                None if extension.is_none() => extension = Some(member),
                _ => return None,
            }
        }

        Some((base?, extension?))
    }
}

fn class_name_or_placeholder(declared: &str, key: &str) -> String {
    let class_name = to_type_name(declared);
    if class_name.is_empty() {
        tracing::warn!(schema = %key, "No extractable class name; using {}", PLACEHOLDER_CLASS_NAME);
        PLACEHOLDER_CLASS_NAME.to_string()
    } else {
        class_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(yaml: &str) -> Contract {
        Contract::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_registers_components_and_skips_scalars() {
        let c = contract(
            r#"
components:
  schemas:
    Order:
      type: object
      properties:
        id:
          type: string
    OrderId:
      type: string
    Priority:
      type: string
      enum: [low, high]
"#,
        );
        let ctx = ResolverContext::build(&c);
        let keys: Vec<_> = ctx.registered().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["Order", "Priority"]);
        assert!(ctx.class_info("Priority").unwrap().is_enum);
        assert!(!ctx.class_info("Order").unwrap().can_be_nested);
    }

    #[test]
    fn test_numeric_names_dropped_and_uri_names_recovered() {
        let c = contract(
            r#"
components:
  schemas:
    "0":
      type: object
      properties:
        a:
          type: string
    "https://acme.io/schemas/order-line.json":
      type: object
      properties:
        sku:
          type: string
"#,
        );
        let ctx = ResolverContext::build(&c);
        assert!(ctx.class_info("0").is_none());
        let info = ctx
            .class_info("https://acme.io/schemas/order-line.json")
            .unwrap();
        assert_eq!(info.class_name, "OrderLine");
    }

    #[test]
    fn test_inheritance_edge_and_alias() {
        let c = contract(
            r#"
components:
  schemas:
    Base:
      type: object
      properties:
        id:
          type: string
    Child:
      allOf:
        - $ref: '#/components/schemas/Base'
        - type: object
          properties:
            extra:
              type: integer
"#,
        );
        let ctx = ResolverContext::build(&c);
        let child = ctx.lookup("Child").unwrap();
        assert_eq!(child.info.super_class.as_deref(), Some("Base"));
        let extension_id = SchemaView::new(child.extension.unwrap())
            .id()
            .unwrap()
            .to_string();
        assert!(extension_id.starts_with("<anonymous-schema-"));
        assert_eq!(ctx.class_info(&extension_id).unwrap().class_name, "Child");
    }

    #[test]
    fn test_composition_without_pair_has_no_edge() {
        let c = contract(
            r#"
components:
  schemas:
    A:
      type: object
    B:
      type: object
    C:
      allOf:
        - $ref: '#/components/schemas/A'
        - $ref: '#/components/schemas/B'
"#,
        );
        let ctx = ResolverContext::build(&c);
        assert_eq!(ctx.class_info("C").unwrap().super_class, None);
    }

    #[test]
    fn test_inline_payload_named_after_message() {
        let c = contract(
            r#"
channels:
  orders/created:
    subscribe:
      message:
        name: orderCreated
        payload:
          type: object
          properties:
            id:
              type: string
"#,
        );
        let ctx = ResolverContext::build(&c);
        let op = c.channels["orders/created"].subscribe.as_ref().unwrap();
        let message = c.message(op.messages()[0]).unwrap().message;
        let info = ctx.payload_class(message).unwrap();
        assert_eq!(info.class_name, "OrderCreated");
        assert_eq!(info.original_name, "orderCreated");
    }

    #[test]
    fn test_record_types_register_recursively() {
        let c = contract(
            r#"
channels:
  ledger:
    publish:
      message:
        schemaFormat: application/vnd.apache.avro;version=1.9.0
        payload:
          type: record
          name: Entry
          namespace: com.acme.ledger
          fields:
            - name: account
              type:
                type: record
                name: Account
                fields:
                  - name: iban
                    type: string
            - name: kind
              type:
                type: enum
                name: Kind
                symbols: [DEBIT, CREDIT]
"#,
        );
        let ctx = ResolverContext::build(&c);
        let keys: Vec<_> = ctx.registered().map(|(k, _)| k.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "com.acme.ledger.Entry",
                "com.acme.ledger.Account",
                "com.acme.ledger.Kind"
            ]
        );
        let account = ctx.record_class("Account", Some("com.acme.ledger")).unwrap();
        assert_eq!(account.namespace.as_deref(), Some("com.acme.ledger"));
        assert!(ctx.record_class("Kind", None).unwrap().is_enum);
    }

    #[test]
    fn test_duplicate_class_names_are_aliased() {
        let c = contract(
            r#"
components:
  schemas:
    order:
      type: object
      properties:
        a:
          type: string
    Order:
      type: object
      properties:
        b:
          type: string
"#,
        );
        let ctx = ResolverContext::build(&c);
        assert_eq!(ctx.registered().count(), 1);
        assert_eq!(ctx.canonical_key("Order"), "order");
    }

    #[test]
    fn test_contexts_are_independent() {
        let first = contract("components:\n  schemas:\n    A:\n      type: object\n");
        let second = contract("components:\n  schemas:\n    B:\n      type: object\n");
        let a = ResolverContext::build(&first);
        let b = ResolverContext::build(&second);
        assert!(a.class_info("B").is_none());
        assert!(b.class_info("A").is_none());
    }
}
