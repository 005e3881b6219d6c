//! Resource type definitions and handlers
//!
//! This module defines:
//! - Resource type definitions (implementing ResourceType trait)
//! - One `ResourceHandler` per resource type, projecting desired attributes
//!   onto typed API requests and API responses back onto attributes

pub mod hyperdrive_config;
pub mod pages_project;

pub use hyperdrive_config::HyperdriveConfigHandler;
pub use pages_project::PagesProjectHandler;

use stratus_core::provider::{ProviderError, ProviderResult, ResourceType};
use stratus_core::resource::{Attributes, Resource, attributes_from_json, attributes_to_json};
use stratus_core::schema::ResourceSchema;

use crate::schemas;

pub const HYPERDRIVE_CONFIG: &str = "hyperdrive_config";
pub const PAGES_PROJECT: &str = "pages_project";

// =============================================================================
// Resource Type Definitions
// =============================================================================

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr, $schema:path) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn schema(&self) -> ResourceSchema {
                $schema()
            }
        }
    };
}

define_resource_type!(
    HyperdriveConfigType,
    HYPERDRIVE_CONFIG,
    schemas::hyperdrive::config_schema
);
define_resource_type!(PagesProjectType, PAGES_PROJECT, schemas::pages::project_schema);

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![Box::new(HyperdriveConfigType), Box::new(PagesProjectType)]
}

// =============================================================================
// Attribute projection
// =============================================================================

/// Deserialize desired attributes into a typed spec whose fields are all
/// optional, so absent attributes stay absent in the request.
fn spec_from_resource<T: serde::de::DeserializeOwned>(desired: &Resource) -> ProviderResult<T> {
    serde_json::from_value(attributes_to_json(&desired.attributes)).map_err(|e| {
        ProviderError::validation(format!("invalid attributes for {}", desired.id.resource_type))
            .with_cause(e)
    })
}

/// Serialize a typed API response into attributes, dropping absent fields
fn attributes_from_model<T: serde::Serialize>(model: &T) -> ProviderResult<Attributes> {
    serde_json::to_value(model)
        .map(|json| attributes_from_json(&json))
        .map_err(|e| ProviderError::new("failed to convert API response").with_cause(e))
}
