//! # Enum Constants
//!
//! Turns enumerated literals into valid constant names.

use crate::naming::{escape_identifier, is_valid_identifier};
use heck::ToShoutySnakeCase;
use serde::Serialize;

/// Prefix for purely numeric literals.
const NUMERIC_PREFIX: &str = "V_";

/// One enum member: the literal on the wire and the constant in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumConstant {
    /// Literal value as it appears in messages.
    pub literal: String,
    /// Constant name.
    pub constant: String,
}

/// Normalizes an enum literal into a constant name.
///
/// - `"3"` → `V_3`
/// - `"low priority"` → `LOW_PRIORITY`, `"in-app"` → `IN_APP`
/// - anything else is kept as is (`"creditCard"` stays `creditCard`)
pub fn normalize_enum_literal(literal: &str) -> String {
    if !literal.is_empty() && literal.chars().all(|c| c.is_ascii_digit()) {
        return format!("{}{}", NUMERIC_PREFIX, literal);
    }
    if literal.contains(' ') || literal.contains('-') {
        return literal.to_shouty_snake_case();
    }
    escape_identifier(literal.to_string())
}

/// Builds constants for a literal set. A constant that collides with an earlier
/// one gets a numeric suffix (`IN_APP_2`) so every literal keeps a member.
pub fn enum_constants(literals: &[String]) -> Vec<EnumConstant> {
    let mut constants: Vec<EnumConstant> = Vec::with_capacity(literals.len());
    for literal in literals {
        let normalized = normalize_enum_literal(literal);
        let taken = |candidate: &str| constants.iter().any(|c| c.constant == candidate);
        let mut constant = normalized.clone();
        let mut suffix = 2;
        while taken(&constant) {
            constant = format!("{}_{}", normalized, suffix);
            suffix += 1;
        }
        if constant != normalized {
            tracing::warn!(literal = %literal, constant = %constant, "Enum constant collides with an earlier literal; suffixed");
        }
        if !is_valid_identifier(&constant) {
            tracing::debug!(literal = %literal, "Enum literal is not a valid identifier");
        }
        constants.push(EnumConstant {
            literal: literal.clone(),
            constant,
        });
    }
    constants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_enum_literal() {
        assert_eq!(normalize_enum_literal("3"), "V_3");
        assert_eq!(normalize_enum_literal("low priority"), "LOW_PRIORITY");
        assert_eq!(normalize_enum_literal("in-app"), "IN_APP");
        assert_eq!(normalize_enum_literal("creditCard"), "creditCard");
        assert_eq!(normalize_enum_literal("PENDING"), "PENDING");
        assert_eq!(normalize_enum_literal("class"), "_class");
    }

    #[test]
    fn test_colliding_constants_are_suffixed() {
        let literals = vec![
            "in-app".to_string(),
            "IN_APP".to_string(),
            "in app".to_string(),
            "42".to_string(),
        ];
        let built = enum_constants(&literals);
        let constants: Vec<(&str, &str)> = built
            .iter()
            .map(|c| (c.literal.as_str(), c.constant.as_str()))
            .collect();
        assert_eq!(
            constants,
            vec![
                ("in-app", "IN_APP"),
                ("IN_APP", "IN_APP_2"),
                ("in app", "IN_APP_3"),
                ("42", "V_42"),
            ]
        );
    }
}
