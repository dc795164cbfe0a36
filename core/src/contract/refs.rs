//! # Reference Utilities
//!
//! Helpers for local `$ref` pointers (`#/components/{section}/{name}`) and for
//! recovering a declared name from the keys an upstream parser hands us.
//! No external document is ever fetched.

use percent_encoding::percent_decode_str;
use url::Url;

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` if the reference is not local or targets another section.
pub fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix('#')?.trim_start_matches('/');
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 || segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}

/// Returns true when a key is an artefact of positional indexing (`"0"`, `"12"`).
pub fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_digit())
}

/// Recovers a declared name from a key that may be URI shaped.
///
/// - `https://acme.io/schemas/order-line.json` → `order-line`
/// - `#/components/schemas/Order` → `Order`
/// - `Order` → `Order`
pub fn recover_declared_name(key: &str) -> String {
    if let Some(name) = extract_component_name(key, "schemas") {
        return name;
    }

    let last_segment = match Url::parse(key) {
        Ok(url) => {
            let from_fragment = url
                .fragment()
                .and_then(|f| f.rsplit('/').find(|s| !s.is_empty()))
                .map(decode_pointer_segment);
            from_fragment.or_else(|| {
                url.path_segments()
                    .and_then(|mut segs| segs.rfind(|s| !s.is_empty()))
                    .map(decode_pointer_segment)
            })
        }
        Err(_) if key.contains('/') => key
            .rsplit('/')
            .find(|s| !s.is_empty())
            .map(decode_pointer_segment),
        Err(_) => None,
    };

    match last_segment {
        Some(seg) => strip_document_extension(&seg).to_string(),
        None => key.to_string(),
    }
}

fn strip_document_extension(name: &str) -> &str {
    for ext in [".schema.json", ".json", ".yaml", ".yml", ".avsc"] {
        if let Some(stem) = name.strip_suffix(ext) {
            return stem;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_component_name() {
        assert_eq!(
            extract_component_name("#/components/schemas/User", "schemas").as_deref(),
            Some("User")
        );
        assert_eq!(
            extract_component_name("#/components/messages/OrderPlaced", "messages").as_deref(),
            Some("OrderPlaced")
        );
        assert!(extract_component_name("#/components/schemas/User", "messages").is_none());
        assert!(extract_component_name("other.yaml#/components/schemas/User", "schemas").is_none());
    }

    #[test]
    fn test_decode_pointer_segment() {
        assert_eq!(decode_pointer_segment("a~1b~0c"), "a/b~c");
        assert_eq!(decode_pointer_segment("Order%20Line"), "Order Line");
    }

    #[test]
    fn test_numeric_keys() {
        assert!(is_numeric_key("0"));
        assert!(is_numeric_key("42"));
        assert!(!is_numeric_key("v1"));
        assert!(!is_numeric_key(""));
    }

    #[test]
    fn test_recover_declared_name() {
        assert_eq!(
            recover_declared_name("https://acme.io/schemas/order-line.json"),
            "order-line"
        );
        assert_eq!(
            recover_declared_name("https://acme.io/defs.json#/definitions/Address"),
            "Address"
        );
        assert_eq!(recover_declared_name("#/components/schemas/Order"), "Order");
        assert_eq!(recover_declared_name("schemas/customer.avsc"), "customer");
        assert_eq!(recover_declared_name("Order"), "Order");
    }
}
