//! # Property Resolution
//!
//! Builds class bodies and resolves property types for both dialects.
//!
//! Nested anonymous objects are resolved recursively and named after the property
//! that owns them, so two structurally identical wrappers under different
//! properties stay distinct classes. A visited set turns self-reference into a
//! plain class reference instead of unbounded recursion.
//!
//! Class names stay unique per namespace: a nested name already held by a
//! registered class or an earlier nested class is prefixed with its owner's name
//! (`OrderCustomer`), then numbered if still taken.

use crate::contract::schema::{Bounds, Dialect, PropertyEntry, SchemaView};
use crate::naming::{to_identifier, to_type_name, ESCAPE_PREFIX};
use crate::schemas::class_info::{ModelClassInfo, PLACEHOLDER_CLASS_NAME};
use crate::schemas::enums::enum_constants;
use crate::schemas::registry::{RegisteredSchema, ResolverContext};
use crate::schemas::{collect_class_imports, ModelProperty, ModelSchema, SchemaKind};
use crate::type_mapping::{collapse_union, is_known_primitive, JavaType, UnionCollapse};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Depth limit for `allOf` flattening.
const MAX_FLATTEN_DEPTH: usize = 8;

/// A resolved type plus what came with it.
#[derive(Debug, Clone)]
struct Resolved {
    ty: JavaType,
    nested: Option<ModelSchema>,
    enum_values: Vec<String>,
    /// Requiredness imposed by a union collapse.
    required: Option<bool>,
}

impl Resolved {
    fn of(ty: JavaType) -> Self {
        Self {
            ty,
            nested: None,
            enum_values: Vec::new(),
            required: None,
        }
    }

    fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    fn opaque() -> Self {
        Self {
            required: Some(true),
            ..Self::of(JavaType::Object)
        }
    }

    fn wrap(self, wrap: impl FnOnce(JavaType) -> JavaType) -> Self {
        Self {
            ty: wrap(self.ty),
            ..self
        }
    }

    fn from_collapse<T>(
        collapse: UnionCollapse<T>,
        mut resolve: impl FnMut(T) -> Resolved,
    ) -> Resolved {
        match collapse {
            UnionCollapse::Optional(branch) => resolve(branch).optional(),
            UnionCollapse::Single(branch) => resolve(branch),
            UnionCollapse::Opaque => Resolved::opaque(),
        }
    }
}

fn is_null_schema(schema: &Value) -> bool {
    match schema {
        Value::String(s) => s == "null",
        Value::Null => true,
        other => SchemaView::new(other).type_names() == ["null"],
    }
}

fn type_name_or_placeholder(raw: &str) -> String {
    let name = to_type_name(raw);
    if name.is_empty() {
        PLACEHOLDER_CLASS_NAME.to_string()
    } else {
        name
    }
}

/// Builds [`ModelSchema`] values and resolves property types against a context.
pub struct SchemaBuilder<'r, 'c> {
    ctx: &'r ResolverContext<'c>,
    visiting: HashSet<String>,
    /// (namespace, class name) pairs already in use.
    claimed: HashSet<(Option<String>, String)>,
    /// Names given to nested objects still being resolved, by guard key.
    in_progress: HashMap<String, String>,
    /// Classes enclosing the node being resolved, innermost last.
    owners: Vec<String>,
}

impl<'r, 'c> SchemaBuilder<'r, 'c> {
    /// A builder over one context.
    pub fn new(ctx: &'r ResolverContext<'c>) -> Self {
        let claimed = ctx
            .registered()
            .map(|(_, entry)| (entry.info.namespace.clone(), entry.info.class_name.clone()))
            .collect();
        Self {
            ctx,
            visiting: HashSet::new(),
            claimed,
            in_progress: HashMap::new(),
            owners: Vec::new(),
        }
    }

    /// Reserves a class name for a nested declaration.
    fn claim_nested_name(&mut self, property: &str, ns: Option<&str>) -> String {
        let base = type_name_or_placeholder(property);
        let namespace = ns.map(str::to_string);
        let owned = match self.owners.last() {
            Some(owner) => format!("{}{}", owner, base),
            None => base.clone(),
        };

        let free = |name: &String| !self.claimed.contains(&(namespace.clone(), name.clone()));
        let name = [base.clone(), owned.clone()]
            .into_iter()
            .find(|candidate| free(candidate))
            .or_else(|| (2..).map(|n| format!("{}{}", owned, n)).find(|candidate| free(candidate)))
            .unwrap_or(owned);

        if name != base {
            tracing::debug!(property, class = %name, "Nested class name taken; disambiguated");
        }
        self.claimed.insert((namespace, name.clone()));
        name
    }

    /// Resolves the type of an arbitrary schema node (payloads, parameters).
    ///
    /// `name_hint` names any inline class the node would declare.
    pub fn resolve_type(
        &mut self,
        name_hint: &str,
        schema: &'c Value,
        dialect: Dialect,
        namespace: Option<&str>,
    ) -> JavaType {
        match dialect {
            Dialect::Structural => self.resolve_structural(name_hint, schema, namespace).ty,
            Dialect::Record => self.resolve_record(schema, namespace).ty,
        }
    }

    /// Builds the class body of a registered schema.
    pub fn build_registered(&mut self, key: &str, entry: &RegisteredSchema<'c>) -> ModelSchema {
        self.visiting.insert(key.to_string());
        self.owners.push(entry.info.class_name.clone());
        let info = &entry.info;
        let view = SchemaView::new(entry.schema);
        let namespace = info.namespace.as_deref();

        let schema = if info.is_enum {
            enum_schema(
                &info.original_name,
                &info.class_name,
                info.namespace.clone(),
                view.enum_values(),
                true,
                info.dialect,
            )
        } else {
            let properties = match info.dialect {
                Dialect::Record => self.record_properties(entry.schema, namespace),
                Dialect::Structural => {
                    let sources = match entry.extension {
                        Some(extension) => vec![entry.schema, extension],
                        None => self.flatten(entry.schema),
                    };
                    self.structural_properties(&sources, namespace)
                }
            };
            class_schema(info, properties, true)
        };

        self.visiting.remove(key);
        self.owners.pop();
        ModelSchema {
            description: view.description().map(str::to_string),
            ..schema
        }
    }

    /// The schema followed by its `allOf` members (dereferenced, recursively).
    fn flatten(&self, schema: &'c Value) -> Vec<&'c Value> {
        let mut sources = Vec::new();
        self.flatten_into(schema, 0, &mut sources);
        sources
    }

    fn flatten_into(&self, schema: &'c Value, depth: usize, out: &mut Vec<&'c Value>) {
        if depth > MAX_FLATTEN_DEPTH || out.iter().any(|s| std::ptr::eq(*s, schema)) {
            return;
        }
        out.push(schema);
        for member in SchemaView::new(schema).all_of() {
            match self.ctx.contract().deref_schema(member) {
                Some(target) => self.flatten_into(target, depth + 1, out),
                None => tracing::warn!("Unresolved allOf member reference skipped"),
            }
        }
    }

    fn structural_properties(
        &mut self,
        sources: &[&'c Value],
        namespace: Option<&str>,
    ) -> Vec<ModelProperty> {
        let required: HashSet<&str> = sources
            .iter()
            .flat_map(|s| SchemaView::new(*s).required())
            .collect();

        let mut properties: Vec<ModelProperty> = Vec::new();
        for source in sources.iter().copied() {
            for entry in SchemaView::new(source).properties() {
                let property =
                    self.structural_property(entry, required.contains(entry.name), namespace);
                // Later members override earlier ones.
                match properties.iter_mut().find(|p| p.name == property.name) {
                    Some(existing) => *existing = property,
                    None => properties.push(property),
                }
            }
        }
        properties
    }

    fn structural_property(
        &mut self,
        entry: PropertyEntry<'c>,
        required: bool,
        namespace: Option<&str>,
    ) -> ModelProperty {
        let resolved = self.resolve_structural(entry.name, entry.schema, namespace);
        let node = self
            .ctx
            .contract()
            .deref_schema(entry.schema)
            .unwrap_or(entry.schema);
        let view = SchemaView::new(node);
        build_property(
            entry.name,
            resolved,
            required,
            view.bounds(),
            entry.doc.or(view.description()),
        )
    }

    fn resolve_structural(&mut self, name: &str, schema: &'c Value, ns: Option<&str>) -> Resolved {
        let view = SchemaView::new(schema);

        if let Some(reference) = view.reference() {
            if let Some(info) = self.ctx.class_for_ref(reference) {
                return Resolved::of(info.java_type());
            }
            let Some((key, target)) = self.ctx.contract().schema_by_ref(reference) else {
                tracing::warn!(reference, "Unresolved schema reference; using Object");
                return Resolved::of(JavaType::Object);
            };
            let guard = format!("#{}", key);
            if !self.visiting.insert(guard.clone()) {
                return Resolved::of(JavaType::Object);
            }
            let resolved = self.resolve_structural(name, target, ns);
            self.visiting.remove(&guard);
            return resolved;
        }

        if let Some(info) = view.id().and_then(|id| self.ctx.class_info(id)) {
            return Resolved::of(info.java_type());
        }

        let types = view.type_names();
        if types.len() > 1 {
            let collapse = collapse_union(&types, |t| t == "null");
            return Resolved::from_collapse(collapse, |t| self.resolve_typed(name, schema, t, ns));
        }

        let variants = if view.one_of().is_empty() {
            view.any_of()
        } else {
            view.one_of()
        };
        if !variants.is_empty() {
            let indices: Vec<usize> = (0..variants.len()).collect();
            let collapse = collapse_union(&indices, |i| is_null_schema(&variants[i]));
            return Resolved::from_collapse(collapse, |i| {
                self.resolve_structural(name, &variants[i], ns)
            });
        }

        let all_of = view.all_of();
        if all_of.len() == 1 && view.properties().is_empty() {
            return self.resolve_structural(name, &all_of[0], ns);
        }

        match view.primary_type() {
            Some(ty) => self.resolve_typed(name, schema, ty, ns),
            None if view.is_object_like() => self.resolve_typed(name, schema, "object", ns),
            None if view.items().is_some() => self.resolve_typed(name, schema, "array", ns),
            None if view.is_enum() => self.resolve_typed(name, schema, "string", ns),
            None => Resolved::of(JavaType::Object),
        }
    }

    fn resolve_typed(&mut self, name: &str, schema: &'c Value, ty: &str, ns: Option<&str>) -> Resolved {
        let view = SchemaView::new(schema);

        match ty {
            "array" => match view.items() {
                Some(Value::Array(_)) | None => Resolved::of(JavaType::list(JavaType::Object)),
                // Anonymous item objects are named from the owning property.
                Some(items) => self.resolve_structural(name, items, ns).wrap(JavaType::list),
            },
            "object" => self.resolve_object(name, schema, ns),
            "null" => Resolved::of(JavaType::Object),
            _ if view.is_enum() => {
                let values = view.enum_values();
                let enum_name = self.claim_nested_name(name, ns);
                let nested = enum_schema(
                    name,
                    &enum_name,
                    ns.map(str::to_string),
                    values.clone(),
                    false,
                    Dialect::Structural,
                );
                Resolved {
                    ty: JavaType::Enum {
                        name: enum_name,
                        namespace: ns.map(str::to_string),
                    },
                    nested: Some(nested),
                    enum_values: values,
                    required: None,
                }
            }
            primitive => Resolved::of(JavaType::from_table(primitive, view.format())),
        }
    }

    fn resolve_object(&mut self, name: &str, schema: &'c Value, ns: Option<&str>) -> Resolved {
        let view = SchemaView::new(schema);
        let declares_body = !view.properties().is_empty() || !view.all_of().is_empty();

        if !declares_body {
            return match view.additional_properties() {
                Some(Value::Bool(true)) => Resolved::of(JavaType::map(JavaType::Object)),
                Some(values) => self.resolve_structural(name, values, ns).wrap(JavaType::map),
                None => Resolved::of(JavaType::Object),
            };
        }

        let guard = view.id().unwrap_or(name).to_string();
        if self.visiting.contains(&guard) {
            // Already resolving this node higher up the stack.
            let class_name = self
                .in_progress
                .get(&guard)
                .cloned()
                .unwrap_or_else(|| type_name_or_placeholder(name));
            return Resolved::of(JavaType::Class {
                name: class_name,
                namespace: ns.map(str::to_string),
            });
        }

        let class_name = self.claim_nested_name(name, ns);
        let class_ty = JavaType::Class {
            name: class_name.clone(),
            namespace: ns.map(str::to_string),
        };
        self.visiting.insert(guard.clone());
        self.in_progress.insert(guard.clone(), class_name.clone());
        self.owners.push(class_name.clone());

        let sources = self.flatten(schema);
        let properties = self.structural_properties(&sources, ns);

        self.owners.pop();
        self.in_progress.remove(&guard);
        self.visiting.remove(&guard);

        let mut info = ModelClassInfo::standalone(
            name,
            class_name,
            ns.map(str::to_string),
            Dialect::Structural,
        );
        info.can_be_nested = true;
        let nested = ModelSchema {
            description: view.description().map(str::to_string),
            ..class_schema(&info, properties, false)
        };
        Resolved {
            nested: Some(nested),
            ..Resolved::of(class_ty)
        }
    }

    fn record_properties(&mut self, schema: &'c Value, ns: Option<&str>) -> Vec<ModelProperty> {
        SchemaView::new(schema)
            .properties()
            .into_iter()
            .map(|field| {
                let resolved = self.resolve_record(field.schema, ns);
                let view = SchemaView::new(field.schema);
                build_property(field.name, resolved, true, Bounds::default(), field.doc.or(view.description()))
            })
            .collect()
    }

    fn resolve_record(&mut self, schema: &'c Value, ns: Option<&str>) -> Resolved {
        match schema {
            Value::String(name) => self.record_named_or_primitive(name, None, ns),
            Value::Array(branches) => {
                let indices: Vec<usize> = (0..branches.len()).collect();
                let collapse = collapse_union(&indices, |i| is_null_schema(&branches[i]));
                Resolved::from_collapse(collapse, |i| self.resolve_record(&branches[i], ns))
            }
            Value::Object(map) => {
                let view = SchemaView::new(schema);
                match map.get("type") {
                    Some(Value::String(kind)) => match kind.as_str() {
                        "record" | "error" | "enum" => {
                            let Some((record_ns, name)) = view.record_name() else {
                                return Resolved::of(JavaType::Object);
                            };
                            self.record_named_or_primitive(name, None, record_ns.or(ns))
                        }
                        "array" => match view.items() {
                            Some(items) => self.resolve_record(items, ns).wrap(JavaType::list),
                            None => Resolved::of(JavaType::list(JavaType::Object)),
                        },
                        "map" => match view.map_values() {
                            Some(values) => self.resolve_record(values, ns).wrap(JavaType::map),
                            None => Resolved::of(JavaType::map(JavaType::Object)),
                        },
                        other => self.record_named_or_primitive(other, view.format(), ns),
                    },
                    Some(nested @ (Value::Object(_) | Value::Array(_))) => {
                        self.resolve_record(nested, ns)
                    }
                    _ => Resolved::of(JavaType::Object),
                }
            }
            _ => Resolved::of(JavaType::Object),
        }
    }

    fn record_named_or_primitive(&self, name: &str, logical: Option<&str>, ns: Option<&str>) -> Resolved {
        if name == "null" {
            return Resolved::of(JavaType::Object);
        }
        if is_known_primitive(name) {
            return Resolved::of(JavaType::from_table(name, logical));
        }
        match self.ctx.record_class(name, ns) {
            Some(info) => Resolved::of(info.java_type()),
            None => {
                tracing::warn!(record = name, "Unknown record-dialect type; using Object");
                Resolved::of(JavaType::Object)
            }
        }
    }
}

fn build_property(
    name: &str,
    resolved: Resolved,
    required: bool,
    bounds: Bounds,
    description: Option<&str>,
) -> ModelProperty {
    let mut identifier = to_identifier(name);
    if identifier.is_empty() {
        identifier = format!("{}property", ESCAPE_PREFIX);
    }
    ModelProperty {
        name: name.to_string(),
        identifier,
        type_name: resolved.ty.to_string(),
        required: resolved.required.unwrap_or(required),
        ty: resolved.ty,
        bounds,
        enum_values: resolved.enum_values,
        nested: resolved.nested.map(Box::new),
        description: description.map(str::to_string),
    }
}

fn class_schema(info: &ModelClassInfo, properties: Vec<ModelProperty>, standalone: bool) -> ModelSchema {
    let mut imports = BTreeSet::new();
    for property in &properties {
        property.ty.collect_imports(&mut imports);
        collect_class_imports(&property.ty, info.namespace.as_deref(), &mut imports);
        if let Some(nested) = &property.nested {
            imports.extend(nested.imports.iter().cloned());
        }
    }

    ModelSchema {
        original_name: info.original_name.clone(),
        class_name: info.class_name.clone(),
        namespace: info.namespace.clone(),
        kind: SchemaKind::Class,
        description: None,
        needs_escaping: properties.iter().any(|p| p.identifier != p.name),
        properties,
        enum_constants: Vec::new(),
        super_class: info.super_class.clone(),
        is_standalone: standalone,
        dialect: info.dialect,
        imports,
    }
}

fn enum_schema(
    original_name: &str,
    class_name: &str,
    namespace: Option<String>,
    literals: Vec<String>,
    standalone: bool,
    dialect: Dialect,
) -> ModelSchema {
    let constants = enum_constants(&literals);
    ModelSchema {
        original_name: original_name.to_string(),
        class_name: class_name.to_string(),
        namespace,
        kind: SchemaKind::Enum,
        description: None,
        properties: Vec::new(),
        needs_escaping: constants.iter().any(|c| c.constant != c.literal),
        enum_constants: constants,
        super_class: None,
        is_standalone: standalone,
        dialect,
        imports: BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Contract;
    use crate::schemas::resolve_schemas;

    fn resolve(yaml: &str) -> Vec<ModelSchema> {
        let contract = Contract::from_yaml(yaml).unwrap();
        let ctx = ResolverContext::build(&contract);
        resolve_schemas(&ctx)
    }

    fn find<'a>(schemas: &'a [ModelSchema], name: &str) -> &'a ModelSchema {
        schemas.iter().find(|s| s.class_name == name).unwrap()
    }

    #[test]
    fn test_structural_property_types() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Customer:
      type: object
      properties:
        id:
          type: string
    Order:
      type: object
      required: [id]
      properties:
        id:
          type: integer
          format: int64
          minimum: 1
        placedAt:
          type: string
          format: date-time
        customer:
          $ref: '#/components/schemas/Customer'
        tags:
          type: array
          items:
            type: string
        attributes:
          type: object
          additionalProperties:
            type: number
        note:
          type: [string, "null"]
        anything:
          type: [string, integer, "null"]
"#,
        );
        let order = find(&schemas, "Order");
        let ty = |name: &str| order.property(name).unwrap().type_name.clone();
        assert_eq!(ty("id"), "Long");
        assert_eq!(ty("placedAt"), "OffsetDateTime");
        assert_eq!(ty("customer"), "Customer");
        assert_eq!(ty("tags"), "List<String>");
        assert_eq!(ty("attributes"), "Map<String, Double>");
        assert_eq!(ty("note"), "String");
        assert_eq!(ty("anything"), "Object");

        assert!(order.property("id").unwrap().required);
        assert_eq!(order.property("id").unwrap().bounds.minimum, Some(1.0));
        assert!(!order.property("note").unwrap().required);
        assert!(order.property("anything").unwrap().required);
        assert!(order.imports.contains("java.time.OffsetDateTime"));
        assert!(order.imports.contains("java.util.List"));
        assert!(order.is_standalone);
    }

    #[test]
    fn test_nested_objects_named_from_owning_property() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Cart:
      type: object
      properties:
        items:
          type: array
          items:
            type: object
            properties:
              sku:
                type: string
        giftItems:
          type: array
          items:
            type: object
            properties:
              sku:
                type: string
"#,
        );
        let cart = find(&schemas, "Cart");
        let items = cart.property("items").unwrap();
        let gifts = cart.property("giftItems").unwrap();
        assert_eq!(items.type_name, "List<Items>");
        assert_eq!(gifts.type_name, "List<GiftItems>");

        let nested = items.nested.as_ref().unwrap();
        assert_eq!(nested.class_name, "Items");
        assert!(!nested.is_standalone);
        assert_eq!(nested.properties[0].name, "sku");
    }

    #[test]
    fn test_nested_names_do_not_shadow_other_classes() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Customer:
      type: object
      properties:
        id:
          type: string
    Order:
      type: object
      properties:
        customer:
          type: object
          properties:
            name:
              type: string
        billing:
          type: object
          properties:
            address:
              type: object
              properties:
                city:
                  type: string
        shipping:
          type: object
          properties:
            address:
              type: object
              properties:
                street:
                  type: string
"#,
        );
        let mut names = Vec::new();
        for schema in &schemas {
            schema.visit(&mut |s| names.push(s.class_name.clone()));
        }
        assert_eq!(
            names,
            vec![
                "Customer",
                "Order",
                "OrderCustomer",
                "Billing",
                "Address",
                "Shipping",
                "ShippingAddress",
            ]
        );
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());

        let order = find(&schemas, "Order");
        assert_eq!(order.property("customer").unwrap().type_name, "OrderCustomer");
    }

    #[test]
    fn test_inline_enum_becomes_nested_enum() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Notification:
      type: object
      properties:
        channel:
          type: string
          enum: [email, in-app, "3"]
"#,
        );
        let notification = find(&schemas, "Notification");
        let channel = notification.property("channel").unwrap();
        assert_eq!(channel.type_name, "Channel");
        assert_eq!(channel.enum_values, vec!["email", "in-app", "3"]);
        let nested = channel.nested.as_ref().unwrap();
        assert_eq!(nested.kind, SchemaKind::Enum);
        let constants: Vec<_> = nested
            .enum_constants
            .iter()
            .map(|c| c.constant.as_str())
            .collect();
        assert_eq!(constants, vec!["email", "IN_APP", "V_3"]);
    }

    #[test]
    fn test_inheritance_keeps_only_extension_properties() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Event:
      type: object
      properties:
        id:
          type: string
    OrderEvent:
      allOf:
        - $ref: '#/components/schemas/Event'
        - type: object
          required: [orderId]
          properties:
            orderId:
              type: string
"#,
        );
        assert_eq!(schemas.len(), 2);
        let child = find(&schemas, "OrderEvent");
        assert_eq!(child.super_class.as_deref(), Some("Event"));
        assert_eq!(child.properties.len(), 1);
        assert!(child.property("orderId").unwrap().required);
    }

    #[test]
    fn test_unpaired_composition_flattens_properties() {
        let schemas = resolve(
            r#"
components:
  schemas:
    A:
      type: object
      properties:
        a:
          type: string
    B:
      type: object
      properties:
        b:
          type: integer
    AB:
      allOf:
        - $ref: '#/components/schemas/A'
        - $ref: '#/components/schemas/B'
"#,
        );
        let ab = find(&schemas, "AB");
        assert_eq!(ab.super_class, None);
        let names: Vec<_> = ab.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_self_reference_through_named_class() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Category:
      type: object
      properties:
        children:
          type: array
          items:
            $ref: '#/components/schemas/Category'
"#,
        );
        let category = find(&schemas, "Category");
        assert_eq!(
            category.property("children").unwrap().type_name,
            "List<Category>"
        );
    }

    #[test]
    fn test_reserved_property_names_are_escaped() {
        let schemas = resolve(
            r#"
components:
  schemas:
    Thing:
      type: object
      properties:
        class:
          type: string
        order-id:
          type: string
"#,
        );
        let thing = find(&schemas, "Thing");
        assert!(thing.needs_escaping);
        assert_eq!(thing.property("class").unwrap().identifier, "_class");
        assert_eq!(thing.property("order-id").unwrap().identifier, "orderId");
    }

    #[test]
    fn test_record_dialect_classes() {
        let schemas = resolve(
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
            - name: amount
              type:
                type: bytes
                logicalType: decimal
                precision: 10
                scale: 2
            - name: bookedAt
              type:
                type: long
                logicalType: timestamp-millis
            - name: memo
              type: ["null", string]
            - name: tags
              type:
                type: array
                items: string
            - name: kind
              type:
                type: enum
                name: Kind
                symbols: [DEBIT, CREDIT]
            - name: previous
              type: ["null", Kind]
"#,
        );
        let entry = find(&schemas, "Entry");
        assert_eq!(entry.dialect, Dialect::Record);
        assert_eq!(entry.namespace.as_deref(), Some("com.acme.ledger"));
        let ty = |name: &str| entry.property(name).unwrap().type_name.clone();
        assert_eq!(ty("amount"), "BigDecimal");
        assert_eq!(ty("bookedAt"), "Instant");
        assert_eq!(ty("memo"), "String");
        assert_eq!(ty("tags"), "List<String>");
        assert_eq!(ty("kind"), "Kind");
        assert_eq!(ty("previous"), "Kind");
        assert!(!entry.property("memo").unwrap().required);
        assert!(entry.property("amount").unwrap().required);
        assert!(entry.imports.contains("java.math.BigDecimal"));

        let kind = find(&schemas, "Kind");
        assert_eq!(kind.kind, SchemaKind::Enum);
        assert_eq!(kind.enum_constants.len(), 2);
    }
}
