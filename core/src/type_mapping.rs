//! # Type Mapping
//!
//! Static lookup from a schema's `(type, format)` pair to the Java type the
//! generated application uses for it, plus a sample literal and the printf
//! token used when the value is formatted into a destination string.
//!
//! Record-dialect (Avro) logical types are looked up through the same table,
//! with the `logicalType` in the format position.
//!
//! Also defines [`JavaType`], the semantic type carried by properties,
//! parameters and handler payloads.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{self, Display};

/// Generic enveloped message type used when a payload type is not fixed.
pub const MESSAGE_TYPE: &str = "Message<?>";
/// Import required by [`MESSAGE_TYPE`].
pub const MESSAGE_IMPORT: &str = "org.springframework.messaging.Message";
/// Opaque object type.
pub const OBJECT_TYPE: &str = "Object";

/// The result of a primitive lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveMapping {
    /// Simple Java type name (e.g. `Long`, `OffsetDateTime`).
    pub target_type: &'static str,
    /// Fully-qualified import when the type is not in `java.lang`.
    pub import: Option<&'static str>,
    /// A literal usable as sample value, `None` for the opaque type.
    pub sample_literal: Option<&'static str>,
    /// printf token used in destination templates.
    pub print_format: &'static str,
}

const fn mapping(
    target_type: &'static str,
    import: Option<&'static str>,
    sample_literal: &'static str,
    print_format: &'static str,
) -> PrimitiveMapping {
    PrimitiveMapping {
        target_type,
        import,
        sample_literal: Some(sample_literal),
        print_format,
    }
}

/// Mapping for unknown or unlisted types.
pub const OPAQUE: PrimitiveMapping = PrimitiveMapping {
    target_type: OBJECT_TYPE,
    import: None,
    sample_literal: None,
    print_format: "%s",
};

const INTEGER: PrimitiveMapping = mapping("Integer", None, "1", "%d");
const LONG: PrimitiveMapping = mapping("Long", None, "1L", "%d");
const FLOAT: PrimitiveMapping = mapping("Float", None, "1.1F", "%f");
const DOUBLE: PrimitiveMapping = mapping("Double", None, "1.1", "%f");
const STRING: PrimitiveMapping = mapping("String", None, "\"string\"", "%s");
const BOOLEAN: PrimitiveMapping = mapping("Boolean", None, "true", "%b");
const BYTES: PrimitiveMapping = mapping("byte[]", None, "new byte[0]", "%s");
const LOCAL_DATE: PrimitiveMapping = mapping(
    "LocalDate",
    Some("java.time.LocalDate"),
    "LocalDate.now()",
    "%s",
);
const LOCAL_TIME: PrimitiveMapping = mapping(
    "LocalTime",
    Some("java.time.LocalTime"),
    "LocalTime.now()",
    "%s",
);
const LOCAL_DATE_TIME: PrimitiveMapping = mapping(
    "LocalDateTime",
    Some("java.time.LocalDateTime"),
    "LocalDateTime.now()",
    "%s",
);
const OFFSET_DATE_TIME: PrimitiveMapping = mapping(
    "OffsetDateTime",
    Some("java.time.OffsetDateTime"),
    "OffsetDateTime.now()",
    "%s",
);
const OFFSET_TIME: PrimitiveMapping = mapping(
    "OffsetTime",
    Some("java.time.OffsetTime"),
    "OffsetTime.now()",
    "%s",
);
const INSTANT: PrimitiveMapping =
    mapping("Instant", Some("java.time.Instant"), "Instant.now()", "%s");
const UUID: PrimitiveMapping = mapping(
    "UUID",
    Some("java.util.UUID"),
    "UUID.randomUUID()",
    "%s",
);
const BIG_DECIMAL: PrimitiveMapping = mapping(
    "BigDecimal",
    Some("java.math.BigDecimal"),
    "BigDecimal.ONE",
    "%f",
);

/// `(type, format)` → mapping. A `None` format is the default for the type.
const TYPE_TABLE: &[(&str, Option<&str>, PrimitiveMapping)] = &[
    // Structural dialect (JSON Schema)
    ("integer", None, INTEGER),
    ("integer", Some("int32"), INTEGER),
    ("integer", Some("int64"), LONG),
    ("number", None, DOUBLE),
    ("number", Some("float"), FLOAT),
    ("number", Some("double"), DOUBLE),
    ("string", None, STRING),
    ("string", Some("date"), LOCAL_DATE),
    ("string", Some("date-time"), OFFSET_DATE_TIME),
    ("string", Some("time"), OFFSET_TIME),
    ("string", Some("byte"), BYTES),
    ("string", Some("binary"), BYTES),
    ("string", Some("uuid"), UUID),
    ("boolean", None, BOOLEAN),
    // Record dialect (Avro) primitives and logical types
    ("int", None, INTEGER),
    ("int", Some("date"), LOCAL_DATE),
    ("int", Some("time-millis"), LOCAL_TIME),
    ("long", None, LONG),
    ("long", Some("time-micros"), LOCAL_TIME),
    ("long", Some("timestamp-millis"), INSTANT),
    ("long", Some("timestamp-micros"), INSTANT),
    ("long", Some("local-timestamp-millis"), LOCAL_DATE_TIME),
    ("long", Some("local-timestamp-micros"), LOCAL_DATE_TIME),
    ("float", None, FLOAT),
    ("double", None, DOUBLE),
    ("bytes", None, BYTES),
    ("bytes", Some("decimal"), BIG_DECIMAL),
    ("fixed", None, BYTES),
    ("fixed", Some("decimal"), BIG_DECIMAL),
];

/// Resolves a primitive `(type, format)` pair.
///
/// Lookup order: exact pair, then the type's default entry. Unknown types map
/// to [`OPAQUE`].
pub fn resolve_primitive(ty: &str, format: Option<&str>) -> PrimitiveMapping {
    let exact = format.and_then(|fmt| {
        TYPE_TABLE
            .iter()
            .find(|(t, f, _)| *t == ty && *f == Some(fmt))
    });
    exact
        .or_else(|| TYPE_TABLE.iter().find(|(t, f, _)| *t == ty && f.is_none()))
        .map(|(_, _, m)| *m)
        .unwrap_or(OPAQUE)
}

/// Returns true when `ty` names a primitive the table knows about.
pub fn is_known_primitive(ty: &str) -> bool {
    TYPE_TABLE.iter().any(|(t, _, _)| *t == ty)
}

/// Semantic type of a property, parameter or payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JavaType {
    /// A table-mapped scalar.
    Primitive {
        /// Simple type name.
        name: String,
        /// Import for the type, if any.
        import: Option<String>,
        /// printf token.
        print_format: String,
    },
    /// `List<T>`.
    List {
        /// Element type.
        item: Box<JavaType>,
    },
    /// `Map<String, T>`.
    Map {
        /// Value type.
        value: Box<JavaType>,
    },
    /// A generated data class.
    Class {
        /// Class name.
        name: String,
        /// Namespace the class lives in, `None` for the application package.
        namespace: Option<String>,
    },
    /// A generated enum.
    Enum {
        /// Enum name.
        name: String,
        /// Namespace the enum lives in, `None` for the application package.
        namespace: Option<String>,
    },
    /// The enveloped message type, payload inspected at runtime.
    Message,
    /// The opaque object type.
    Object,
}

impl JavaType {
    /// Builds a type from a primitive table entry.
    pub fn primitive(mapping: PrimitiveMapping) -> Self {
        if mapping.target_type == OBJECT_TYPE {
            return JavaType::Object;
        }
        JavaType::Primitive {
            name: mapping.target_type.to_string(),
            import: mapping.import.map(str::to_string),
            print_format: mapping.print_format.to_string(),
        }
    }

    /// Shorthand for `resolve_primitive` followed by [`JavaType::primitive`].
    pub fn from_table(ty: &str, format: Option<&str>) -> Self {
        Self::primitive(resolve_primitive(ty, format))
    }

    /// `List<item>`.
    pub fn list(item: JavaType) -> Self {
        JavaType::List {
            item: Box::new(item),
        }
    }

    /// `Map<String, value>`.
    pub fn map(value: JavaType) -> Self {
        JavaType::Map {
            value: Box::new(value),
        }
    }

    /// The `String` type, used as the fallback for parameters.
    pub fn string() -> Self {
        Self::primitive(STRING)
    }

    /// The printf token used when formatting a value of this type.
    pub fn print_format(&self) -> &str {
        match self {
            JavaType::Primitive { print_format, .. } => print_format,
            _ => "%s",
        }
    }

    /// The generated class or enum name this type refers to, if any.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            JavaType::Class { name, .. } | JavaType::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Fully-qualified name of the referenced class when it lives in a namespace.
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            JavaType::Class {
                name,
                namespace: Some(ns),
            }
            | JavaType::Enum {
                name,
                namespace: Some(ns),
            } => Some(format!("{}.{}", ns, name)),
            _ => None,
        }
    }

    /// Collects the imports this type needs (not including generated classes).
    pub fn collect_imports(&self, into: &mut BTreeSet<String>) {
        match self {
            JavaType::Primitive {
                import: Some(import),
                ..
            } => {
                into.insert(import.clone());
            }
            JavaType::List { item } => {
                into.insert("java.util.List".to_string());
                item.collect_imports(into);
            }
            JavaType::Map { value } => {
                into.insert("java.util.Map".to_string());
                value.collect_imports(into);
            }
            JavaType::Message => {
                into.insert(MESSAGE_IMPORT.to_string());
            }
            _ => {}
        }
    }
}

impl Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive { name, .. } => write!(f, "{}", name),
            JavaType::List { item } => write!(f, "List<{}>", item),
            JavaType::Map { value } => write!(f, "Map<String, {}>", value),
            JavaType::Class { name, .. } | JavaType::Enum { name, .. } => write!(f, "{}", name),
            JavaType::Message => write!(f, "{}", MESSAGE_TYPE),
            JavaType::Object => write!(f, "{}", OBJECT_TYPE),
        }
    }
}

/// Outcome of collapsing a union of types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionCollapse<T> {
    /// Exactly one concrete branch and at least one absence marker: optional.
    Optional(T),
    /// Exactly one concrete branch and no absence marker.
    Single(T),
    /// More than one concrete branch (or none): opaque object, forced required.
    Opaque,
}

impl<T> UnionCollapse<T> {
    /// Whether the collapsed type is required.
    pub fn is_required(&self) -> bool {
        !matches!(self, UnionCollapse::Optional(_))
    }
}

/// Collapses union branches.
///
/// A type unioned with an absence marker becomes that type, not required.
/// A union of more than one concrete type becomes the opaque object type and is
/// forced required; the nullability is intentionally dropped.
pub fn collapse_union<T: Copy>(
    branches: &[T],
    is_absence: impl Fn(T) -> bool,
) -> UnionCollapse<T> {
    let mut concrete = branches.iter().copied().filter(|b| !is_absence(*b));
    let has_absence = branches.iter().copied().any(&is_absence);
    match (concrete.next(), concrete.next()) {
        (Some(only), None) if has_absence => UnionCollapse::Optional(only),
        (Some(only), None) => UnionCollapse::Single(only),
        _ => UnionCollapse::Opaque,
    }
}
