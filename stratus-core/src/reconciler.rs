//! Reconciler - Project desired state onto a remote resource and back
//!
//! A [`ResourceHandler`] knows how to talk to the remote API for one resource
//! type. The [`Reconciler`] wraps it with the lifecycle rules shared by every
//! resource type: scope resolution, identity bookkeeping, read-after-write
//! normalization, idempotent delete and composite-ID import.

use async_trait::async_trait;

use crate::import::ImportId;
use crate::provider::{ProviderError, ProviderErrorKind, ProviderResult};
use crate::resource::{Attributes, Resource, ResourceId, State, Value};
use crate::schema::ResourceSchema;

/// Remote operations for a single resource type
///
/// Implementations build requests from only the attributes present in the
/// desired state and report an absent remote object as a NotFound error.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Resource type name (e.g., "hyperdrive_config")
    fn resource_type(&self) -> &'static str;

    fn schema(&self) -> ResourceSchema;

    /// Attribute holding the scope every remote call is made in
    fn scope_attribute(&self) -> &'static str {
        "account_id"
    }

    /// Create the remote resource and return its identifier
    async fn create(&self, scope: &str, desired: &Resource) -> ProviderResult<String>;

    /// Fetch every observable attribute of the remote resource
    async fn read(&self, scope: &str, identifier: &str) -> ProviderResult<Attributes>;

    /// Update the remote resource and return the identifier echoed by the remote
    async fn update(
        &self,
        scope: &str,
        identifier: &str,
        desired: &Resource,
    ) -> ProviderResult<String>;

    async fn delete(&self, scope: &str, identifier: &str) -> ProviderResult<()>;
}

/// Lifecycle adapter around a [`ResourceHandler`]
pub struct Reconciler<H> {
    handler: H,
}

impl<H: ResourceHandler> Reconciler<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Check desired attributes against the handler's schema
    pub fn validate(&self, desired: &Resource) -> ProviderResult<()> {
        self.handler
            .schema()
            .validate(&desired.attributes)
            .map_err(|errors| {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                ProviderError::validation(messages.join("; ")).for_resource(desired.id.clone())
            })
    }

    pub async fn create(&self, desired: &Resource) -> ProviderResult<State> {
        let scope = self.desired_scope(desired)?;

        // Nothing exists yet, so a NotFound here refers to the scope and is
        // an ordinary remote failure
        let identifier = self
            .handler
            .create(scope, desired)
            .await
            .map_err(|mut e| {
                if e.is_not_found() {
                    e.kind = ProviderErrorKind::Remote;
                }
                e.for_resource(desired.id.clone())
            })?;

        if identifier.is_empty() {
            return Err(ProviderError::empty_response(format!(
                "create returned no identifier for {}",
                self.handler.resource_type()
            ))
            .for_resource(desired.id.clone()));
        }
        log::info!("Created {} with identifier {}", desired.id, identifier);

        let state = self.read(&desired.id, scope, Some(identifier.as_str())).await?;
        self.settle(state, desired)
    }

    /// Read the remote resource
    ///
    /// A missing identifier or a remote NotFound yields `State::not_found`,
    /// so the caller can drop the resource from its local tracking.
    pub async fn read(
        &self,
        id: &ResourceId,
        scope: &str,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let identifier = match identifier {
            Some(identifier) if !identifier.is_empty() => identifier,
            _ => return Ok(State::not_found(id.clone())),
        };

        match self.handler.read(scope, identifier).await {
            Ok(mut attributes) => {
                attributes.insert(
                    self.handler.scope_attribute().to_string(),
                    Value::String(scope.to_string()),
                );
                Ok(State::existing(id.clone(), attributes).with_identifier(identifier))
            }
            Err(e) if e.is_not_found() => {
                log::info!("{} {} no longer exists", id, identifier);
                Ok(State::not_found(id.clone()))
            }
            Err(e) => Err(e.for_resource(id.clone())),
        }
    }

    pub async fn update(&self, current: &State, desired: &Resource) -> ProviderResult<State> {
        let identifier = current.identifier.as_deref().ok_or_else(|| {
            ProviderError::not_found("cannot update a resource that has not been created")
                .for_resource(desired.id.clone())
        })?;
        let scope = self.desired_scope(desired)?;

        let echoed = self
            .handler
            .update(scope, identifier, desired)
            .await
            .map_err(|e| e.for_resource(desired.id.clone()))?;

        if echoed.is_empty() {
            return Err(ProviderError::empty_response(
                "failed to find id in update response; resource was empty",
            )
            .for_resource(desired.id.clone()));
        }
        if echoed != identifier {
            return Err(ProviderError::empty_response(format!(
                "update response returned identifier {} for resource {}",
                echoed, identifier
            ))
            .for_resource(desired.id.clone()));
        }

        let state = self.read(&desired.id, scope, Some(identifier)).await?;
        self.settle(state, desired)
    }

    /// Delete the remote resource and return the cleared state
    pub async fn delete(&self, current: &State) -> ProviderResult<State> {
        let Some(identifier) = current.identifier.as_deref() else {
            log::debug!("{} has no identifier, nothing to delete", current.id);
            return Ok(State::not_found(current.id.clone()));
        };
        let scope = current
            .get_string(self.handler.scope_attribute())
            .ok_or_else(|| self.missing_scope(&current.id))?;

        log::info!("Deleting {} with identifier {}", current.id, identifier);
        match self.handler.delete(scope, identifier).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                log::info!("{} {} was already deleted", current.id, identifier);
            }
            Err(e) => return Err(e.for_resource(current.id.clone())),
        }

        Ok(State::not_found(current.id.clone()))
    }

    /// Adopt an existing remote resource from `<scope>/<identifier>`
    pub async fn import(&self, id: &ResourceId, import_id: &str) -> ProviderResult<State> {
        let parsed: ImportId = import_id
            .parse()
            .map_err(|e: ProviderError| e.for_resource(id.clone()))?;
        log::debug!(
            "Importing {} {} for scope {}",
            id.resource_type,
            parsed.identifier,
            parsed.scope
        );

        let state = self
            .read(id, &parsed.scope, Some(parsed.identifier.as_str()))
            .await?;
        if !state.exists {
            return Err(ProviderError::not_found(format!(
                "cannot import non-existent remote object {}",
                parsed
            ))
            .for_resource(id.clone()));
        }
        Ok(state)
    }

    fn desired_scope<'a>(&self, desired: &'a Resource) -> ProviderResult<&'a str> {
        desired
            .get_string(self.handler.scope_attribute())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.missing_scope(&desired.id))
    }

    fn missing_scope(&self, id: &ResourceId) -> ProviderError {
        ProviderError::validation(format!(
            "Required attribute '{}' is missing",
            self.handler.scope_attribute()
        ))
        .for_resource(id.clone())
    }

    /// Carry write-only attributes from desired state into the normalized
    /// snapshot; the remote never echoes them back.
    fn settle(&self, mut state: State, desired: &Resource) -> ProviderResult<State> {
        if !state.exists {
            return Err(ProviderError::not_found(
                "resource disappeared immediately after being written",
            )
            .for_resource(desired.id.clone()));
        }
        let schema = self.handler.schema();
        for name in schema.write_only_attributes() {
            if let Some(value) = desired.attributes.get(name) {
                state.attributes.insert(name.to_string(), value.clone());
            }
        }
        Ok(state)
    }
}
