//! # Schema View
//!
//! A borrowed, read-only view over a raw schema node of either dialect:
//!
//! - **Structural** (JSON Schema / AsyncAPI schema objects): `type`, `format`,
//!   `properties`, `items`, `allOf`, `enum`, ...
//! - **Record** (Avro): `record`/`enum`/`fixed` named types, field lists,
//!   unions written as arrays, `logicalType`.
//!
//! Property collections arrive in several shapes depending on dialect and
//! nesting depth. [`SchemaView::properties`] normalizes all of them into one
//! ordered `(name, schema)` sequence so the resolver never looks at the raw shape.

use serde::Serialize;
use serde_json::Value;

/// Extension key carrying a schema's identity.
pub const SCHEMA_ID_KEY: &str = "x-parser-schema-id";

/// Prefix of synthetic ids given to schemas without a declared name.
pub const ANONYMOUS_SCHEMA_PREFIX: &str = "<anonymous-schema-";

/// Marker shared by every synthetic anonymous name (schemas and messages).
pub const ANONYMOUS_MARKER: &str = "<anonymous";

/// Returns true when `name` is a synthetic anonymous name.
pub fn is_anonymous_name(name: &str) -> bool {
    name.starts_with(ANONYMOUS_MARKER)
}

/// The two supported schema dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Dialect {
    /// JSON Schema / AsyncAPI schema objects.
    Structural,
    /// Avro records, enums and unions.
    Record,
}

impl Dialect {
    /// Detects the dialect of a root schema node.
    pub fn detect(value: &Value) -> Dialect {
        match value {
            Value::String(_) | Value::Array(_) => Dialect::Record,
            Value::Object(map) => match map.get("type") {
                Some(Value::String(t)) if matches!(t.as_str(), "record" | "fixed" | "map") => {
                    Dialect::Record
                }
                Some(Value::String(t)) if t == "enum" && map.contains_key("symbols") => {
                    Dialect::Record
                }
                Some(Value::Object(_)) => Dialect::Record,
                _ => Dialect::Structural,
            },
            _ => Dialect::Structural,
        }
    }

    /// Detects the dialect of a message payload from its declared schema format.
    pub fn from_schema_format(schema_format: Option<&str>, payload: &Value) -> Dialect {
        match schema_format {
            Some(fmt) if fmt.to_ascii_lowercase().contains("avro") => Dialect::Record,
            _ => Dialect::detect(payload),
        }
    }
}

/// One normalized property (or record field).
#[derive(Debug, Clone, Copy)]
pub struct PropertyEntry<'a> {
    /// Declared property name.
    pub name: &'a str,
    /// The property's own schema.
    pub schema: &'a Value,
    /// Optional documentation attached to the entry (Avro `doc`).
    pub doc: Option<&'a str>,
}

/// Numeric and size constraints of a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// `minimum` / `exclusiveMinimum`.
    pub minimum: Option<f64>,
    /// `maximum` / `exclusiveMaximum`.
    pub maximum: Option<f64>,
    /// Whether `minimum` is exclusive.
    pub exclusive_minimum: bool,
    /// Whether `maximum` is exclusive.
    pub exclusive_maximum: bool,
    /// `minLength`.
    pub min_length: Option<u64>,
    /// `maxLength`.
    pub max_length: Option<u64>,
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
}

impl Bounds {
    /// Returns true when no constraint is set.
    pub fn is_empty(&self) -> bool {
        *self == Bounds::default()
    }
}

/// Borrowed view over a raw schema node.
#[derive(Debug, Clone, Copy)]
pub struct SchemaView<'a> {
    value: &'a Value,
}

impl<'a> SchemaView<'a> {
    /// Wraps a raw node.
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// The raw node.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Reads a string field.
    pub fn str_field(&self, key: &str) -> Option<&'a str> {
        self.value.get(key).and_then(Value::as_str)
    }

    /// The schema identity assigned at load time.
    pub fn id(&self) -> Option<&'a str> {
        self.str_field(SCHEMA_ID_KEY)
    }

    /// True when the schema has no declared name.
    pub fn is_anonymous(&self) -> bool {
        self.id().map_or(true, is_anonymous_name)
    }

    /// The `$ref` target, if this node is a reference.
    pub fn reference(&self) -> Option<&'a str> {
        self.str_field("$ref")
    }

    /// `title`.
    pub fn title(&self) -> Option<&'a str> {
        self.str_field("title")
    }

    /// `description` (structural) or `doc` (record).
    pub fn description(&self) -> Option<&'a str> {
        self.str_field("description").or_else(|| self.str_field("doc"))
    }

    /// All type names: a single `type` string or a JSON Schema type list.
    pub fn type_names(&self) -> Vec<&'a str> {
        match self.value {
            Value::String(s) => vec![s.as_str()],
            _ => match self.value.get("type") {
                Some(Value::String(s)) => vec![s.as_str()],
                Some(Value::Array(list)) => list.iter().filter_map(Value::as_str).collect(),
                _ => Vec::new(),
            },
        }
    }

    /// The single declared type, when exactly one is declared.
    pub fn primary_type(&self) -> Option<&'a str> {
        match self.type_names().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// `format` (structural) or `logicalType` (record).
    pub fn format(&self) -> Option<&'a str> {
        self.str_field("format")
            .or_else(|| self.str_field("logicalType"))
    }

    /// `items` of an array schema.
    pub fn items(&self) -> Option<&'a Value> {
        self.value.get("items")
    }

    /// `values` of a record-dialect map schema.
    pub fn map_values(&self) -> Option<&'a Value> {
        self.value.get("values")
    }

    /// `additionalProperties` when it is a schema or `true`.
    pub fn additional_properties(&self) -> Option<&'a Value> {
        match self.value.get("additionalProperties") {
            Some(Value::Bool(false)) | None => None,
            other => other,
        }
    }

    fn list(&self, key: &str) -> &'a [Value] {
        self.value
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `allOf` members.
    pub fn all_of(&self) -> &'a [Value] {
        self.list("allOf")
    }

    /// `oneOf` members.
    pub fn one_of(&self) -> &'a [Value] {
        self.list("oneOf")
    }

    /// `anyOf` members.
    pub fn any_of(&self) -> &'a [Value] {
        self.list("anyOf")
    }

    /// Names listed in `required`.
    pub fn required(&self) -> Vec<&'a str> {
        self.list("required")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    /// Enumerated literals (`enum` or Avro `symbols`), stringified, nulls dropped.
    pub fn enum_values(&self) -> Vec<String> {
        let raw = match self.value.get("enum") {
            Some(Value::Array(list)) => list.as_slice(),
            _ => self.list("symbols"),
        };
        raw.iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect()
    }

    /// True when the schema constrains values to an enumeration.
    pub fn is_enum(&self) -> bool {
        !self.enum_values().is_empty()
    }

    /// True when the node declares object-shaped content.
    pub fn is_object_like(&self) -> bool {
        let Some(map) = self.value.as_object() else {
            return false;
        };
        matches!(self.primary_type(), Some("object") | Some("record"))
            || map.contains_key("properties")
            || map.contains_key("fields")
            || (!self.all_of().is_empty() && self.primary_type().is_none())
    }

    /// Avro `name`, split into (namespace, simple name) when dotted.
    pub fn record_name(&self) -> Option<(Option<&'a str>, &'a str)> {
        let name = self.value.as_object()?.get("name")?.as_str()?;
        match name.rsplit_once('.') {
            Some((ns, simple)) => Some((Some(ns), simple)),
            None => Some((self.str_field("namespace"), name)),
        }
    }

    /// Numeric and size constraints.
    pub fn bounds(&self) -> Bounds {
        let num = |key: &str| self.value.get(key).and_then(Value::as_f64);
        let count = |key: &str| self.value.get(key).and_then(Value::as_u64);

        let mut bounds = Bounds {
            minimum: num("minimum"),
            maximum: num("maximum"),
            min_length: count("minLength"),
            max_length: count("maxLength"),
            min_items: count("minItems"),
            max_items: count("maxItems"),
            ..Bounds::default()
        };

        // 2019+ style: numeric exclusive bounds. OAS 3.0 style: boolean flags.
        match self.value.get("exclusiveMinimum") {
            Some(Value::Bool(flag)) => bounds.exclusive_minimum = *flag,
            Some(v) if v.is_number() => {
                bounds.minimum = v.as_f64();
                bounds.exclusive_minimum = true;
            }
            _ => {}
        }
        match self.value.get("exclusiveMaximum") {
            Some(Value::Bool(flag)) => bounds.exclusive_maximum = *flag,
            Some(v) if v.is_number() => {
                bounds.maximum = v.as_f64();
                bounds.exclusive_maximum = true;
            }
            _ => {}
        }
        bounds
    }

    /// Normalizes every supported property shape into an ordered sequence.
    ///
    /// Accepted shapes:
    /// - map: `properties: { id: {...}, name: {...} }`
    /// - list of named entries: `properties: [{ name: id, schema: {...} }]`
    /// - list of single-pair maps: `properties: [{ id: {...} }]`
    /// - record fields: `fields: [{ name: id, type: ... }]`
    pub fn properties(&self) -> Vec<PropertyEntry<'a>> {
        let mut entries = Vec::new();
        if let Some(props) = self.value.get("properties") {
            collect_entries(props, "schema", &mut entries);
        }
        if let Some(fields) = self.value.get("fields") {
            collect_entries(fields, "type", &mut entries);
        }
        entries
    }
}

fn collect_entries<'a>(node: &'a Value, schema_key: &str, out: &mut Vec<PropertyEntry<'a>>) {
    match node {
        Value::Object(map) => {
            for (name, schema) in map {
                out.push(PropertyEntry {
                    name,
                    schema,
                    doc: None,
                });
            }
        }
        Value::Array(list) => {
            for entry in list {
                let Some(map) = entry.as_object() else {
                    continue;
                };
                match (map.get("name").and_then(Value::as_str), map.get(schema_key)) {
                    (Some(name), Some(schema)) => out.push(PropertyEntry {
                        name,
                        schema,
                        doc: map.get("doc").and_then(Value::as_str),
                    }),
                    // `{ name: id, type: string }` in a structural list: the entry is the schema.
                    (Some(name), None) => out.push(PropertyEntry {
                        name,
                        schema: entry,
                        doc: None,
                    }),
                    (None, _) if map.len() == 1 => {
                        if let Some((name, schema)) = map.iter().next() {
                            out.push(PropertyEntry {
                                name,
                                schema,
                                doc: None,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}
