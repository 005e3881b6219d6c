//! Cloudflare-specific type definitions

use std::sync::LazyLock;

use regex::Regex;
use stratus_core::resource::Value;
use stratus_core::schema::{AttributeType, types};

static COMPATIBILITY_DATE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").ok());

/// Workers runtime compatibility date (`YYYY-MM-DD`)
pub fn compatibility_date() -> AttributeType {
    AttributeType::Custom {
        name: "CompatibilityDate".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| match (value, COMPATIBILITY_DATE.as_ref()) {
            (Value::String(s), Some(re)) if re.is_match(s) => Ok(()),
            (Value::String(s), _) => Err(format!(
                "Invalid compatibility date '{}', expected YYYY-MM-DD",
                s
            )),
            _ => Err("Expected string".to_string()),
        },
    }
}

/// Postgres connection scheme accepted by Hyperdrive
pub fn database_scheme() -> AttributeType {
    types::one_of(&["postgres", "postgresql"])
}

/// Git provider a Pages project deploys from
pub fn source_type() -> AttributeType {
    types::one_of(&["github", "gitlab"])
}
