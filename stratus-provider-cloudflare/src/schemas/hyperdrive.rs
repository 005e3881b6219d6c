//! Hyperdrive config schema definition

use stratus_core::resource::Value;
use stratus_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::types::database_scheme;

fn origin_block() -> AttributeType {
    AttributeType::Block(vec![
        AttributeSchema::new("database", AttributeType::String)
            .required()
            .with_description("The name of your origin database"),
        AttributeSchema::new("host", AttributeType::String)
            .required()
            .with_description("The host (hostname or IP) of your origin database"),
        AttributeSchema::new("port", types::port_number())
            .with_default(Value::Int(5432))
            .with_description("The port of your origin database"),
        AttributeSchema::new("scheme", database_scheme())
            .with_default(Value::from("postgres"))
            .with_description("Specifies the URL scheme used to connect to your origin database"),
        AttributeSchema::new("user", AttributeType::String)
            .with_description("The user of your origin database"),
    ])
}

fn caching_block() -> AttributeType {
    AttributeType::Block(vec![
        AttributeSchema::new("disabled", AttributeType::Bool)
            .with_default(Value::Bool(false))
            .with_description("Disable caching of queries for this config"),
        AttributeSchema::new("max_age", types::non_negative_int())
            .with_default(Value::Int(60))
            .with_description("Maximum duration, in seconds, a cached item is served"),
        AttributeSchema::new("stale_while_revalidate", types::non_negative_int())
            .with_default(Value::Int(15))
            .with_description(
                "Number of seconds a stale item may be served while it is revalidated",
            ),
    ])
}

/// Returns the schema for Hyperdrive configs
pub fn config_schema() -> ResourceSchema {
    ResourceSchema::new("hyperdrive_config")
        .with_description("A Hyperdrive database connection configuration")
        .attribute(
            AttributeSchema::new("account_id", AttributeType::String)
                .required()
                .with_description("The account identifier to target for the resource"),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .with_description("The name of the Hyperdrive configuration"),
        )
        .attribute(
            AttributeSchema::new("password", AttributeType::String)
                .required()
                .write_only()
                .with_description("The password of the Hyperdrive configuration"),
        )
        .attribute(
            AttributeSchema::new("origin", origin_block())
                .required()
                .with_description("The origin details for the Hyperdrive configuration"),
        )
        .attribute(
            AttributeSchema::new("caching", caching_block())
                .with_description("The caching details for the Hyperdrive configuration"),
        )
}
