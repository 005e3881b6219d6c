//! Cloudflare API client
//!
//! The handlers only see the [`HyperdriveApi`] and [`PagesApi`] traits, so the
//! HTTP client can be swapped for any other implementation.
//!
//! ## Module Structure
//!
//! - `hyperdrive` - Hyperdrive config models and API trait
//! - `pages` - Pages project models and API trait
//! - `http` - reqwest implementation of both traits

pub mod http;
pub mod hyperdrive;
#[cfg(test)]
pub(crate) mod memory;
pub mod pages;

pub use http::CloudflareClient;
pub use hyperdrive::HyperdriveApi;
pub use pages::PagesApi;

use stratus_core::provider::ProviderError;
use thiserror::Error;

/// Errors returned by the API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The API answered with a failure status or `success: false`
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never got a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The response could not be understood
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Rate limits, server errors and transport failures may succeed on retry
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http { status, .. } => *status == 429 || *status >= 500,
            ApiError::Transport(_) => true,
            ApiError::NotFound(_) | ApiError::Decode(_) => false,
        }
    }

    /// Wrap into a ProviderError describing the failed operation
    pub fn into_provider_error(self, operation: impl Into<String>) -> ProviderError {
        let transient = self.is_transient();
        let error = match self {
            ApiError::NotFound(_) => ProviderError::not_found(operation),
            _ => ProviderError::new(operation),
        };
        error.with_transient(transient).with_cause(self)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Everything the Cloudflare provider needs from a client
pub trait CloudflareApi: HyperdriveApi + PagesApi {}

impl<T: HyperdriveApi + PagesApi> CloudflareApi for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_core::provider::{ErrorClass, ProviderErrorKind};

    #[test]
    fn transient_classification() {
        assert!(
            ApiError::Http {
                status: 429,
                message: "rate limited".to_string()
            }
            .is_transient()
        );
        assert!(
            ApiError::Http {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_transient()
        );
        assert!(
            !ApiError::Http {
                status: 400,
                message: "bad request".to_string()
            }
            .is_transient()
        );
        assert!(ApiError::Transport("connection refused".to_string()).is_transient());
    }

    #[test]
    fn not_found_maps_to_not_found_kind() {
        let err = ApiError::NotFound("hyperdrive config abc".to_string())
            .into_provider_error("error reading hyperdrive config");
        assert_eq!(err.kind, ProviderErrorKind::NotFound);
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[test]
    fn server_error_maps_to_transient_remote() {
        let err = ApiError::Http {
            status: 500,
            message: "internal error".to_string(),
        }
        .into_provider_error("error creating hyperdrive config");
        assert_eq!(err.kind, ProviderErrorKind::Remote);
        assert_eq!(err.class(), ErrorClass::Transient);
        assert_eq!(
            err.to_string(),
            "error creating hyperdrive config: HTTP 500: internal error"
        );
    }
}
