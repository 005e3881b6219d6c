//! Provider - Trait abstracting resource operations
//!
//! A Provider defines operations for a specific platform (Cloudflare, etc.).
//! It is responsible for projecting desired state onto remote API calls and
//! writing the responses back as observed state.

use std::future::Future;
use std::pin::Pin;

use crate::resource::{Resource, ResourceId, State};
use crate::schema::ResourceSchema;

/// What went wrong in a Provider operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The remote client call failed
    Remote,
    /// The remote service confirmed the resource does not exist
    NotFound,
    /// The remote call succeeded but returned no usable identifier
    EmptyResponse,
    /// A composite import ID could not be parsed
    MalformedId,
    /// Desired state failed schema validation
    Validation,
    /// The provider does not handle this resource type
    UnsupportedResource,
}

/// How the caller should treat an error when deciding whether to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Transient,
    NotFound,
    Fatal,
}

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub resource_id: Option<ResourceId>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// Set by the client layer for rate limits, server errors and transport failures
    pub transient: bool,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.resource_id {
            write!(f, "[{}.{}] {}", id.resource_type, id.name, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(ref cause) = self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    fn with_kind(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            resource_id: None,
            cause: None,
            transient: false,
        }
    }

    /// A failed remote call
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Remote, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::NotFound, message)
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::EmptyResponse, message)
    }

    pub fn malformed_id(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::MalformedId, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_kind(ProviderErrorKind::Validation, message)
    }

    pub fn unsupported_resource(resource_type: &str) -> Self {
        Self::with_kind(
            ProviderErrorKind::UnsupportedResource,
            format!("Unknown resource type: {}", resource_type),
        )
    }

    pub fn for_resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn with_transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }

    /// Prefix the message with the operation that failed, keeping kind and cause
    pub fn context(mut self, operation: impl std::fmt::Display) -> Self {
        self.message = format!("{}: {}", operation, self.message);
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ProviderErrorKind::NotFound
    }

    pub fn class(&self) -> ErrorClass {
        match self.kind {
            ProviderErrorKind::NotFound => ErrorClass::NotFound,
            ProviderErrorKind::Remote if self.transient => ErrorClass::Transient,
            _ => ErrorClass::Fatal,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Definition of resource types that a Provider can handle
pub trait ResourceType: Send + Sync {
    /// Resource type name (e.g., "hyperdrive_config")
    fn name(&self) -> &'static str;

    /// Attribute schema for this resource type
    fn schema(&self) -> ResourceSchema;
}

/// Main Provider trait
///
/// Each platform provider implements this trait. All remote operations are
/// async; none of them keep state between calls.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "cloudflare")
    fn name(&self) -> &'static str;

    /// List of resource types this Provider can handle
    fn resource_types(&self) -> Vec<Box<dyn ResourceType>>;

    /// Check desired attributes against the resource type's schema
    fn validate(&self, resource: &Resource) -> ProviderResult<()>;

    /// Get the current state of a resource
    ///
    /// Returns `State::not_found()` if there is no identifier or the remote
    /// service reports the resource absent.
    fn read(
        &self,
        id: &ResourceId,
        scope: &str,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Create a resource
    ///
    /// Returns State with identifier set to the remote ID
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Update a resource previously created or imported
    fn update(&self, from: &State, to: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Delete a resource
    ///
    /// Returns the cleared state. Deleting a resource with no identifier, or
    /// one already gone remotely, succeeds.
    fn delete(&self, current: &State) -> BoxFuture<'_, ProviderResult<State>>;

    /// Adopt an existing remote resource from a `<scope>/<resource-id>` string
    fn import(&self, id: &ResourceId, import_id: &str) -> BoxFuture<'_, ProviderResult<State>>;
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        (**self).resource_types()
    }

    fn validate(&self, resource: &Resource) -> ProviderResult<()> {
        (**self).validate(resource)
    }

    fn read(
        &self,
        id: &ResourceId,
        scope: &str,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).read(id, scope, identifier)
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).create(resource)
    }

    fn update(&self, from: &State, to: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).update(from, to)
    }

    fn delete(&self, current: &State) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).delete(current)
    }

    fn import(&self, id: &ResourceId, import_id: &str) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).import(id, import_id)
    }
}
