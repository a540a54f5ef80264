//! Conversions from external infrastructure errors into domain errors.

use freeagent_common::{AuthError, OAuthClientError};
use freeagent_domain::FreeAgentError;
use reqwest::Error as HttpError;

use crate::api::ApiError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FreeAgentError);

impl From<InfraError> for FreeAgentError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FreeAgentError> for InfraError {
    fn from(value: FreeAgentError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFreeAgentError {
    fn into_freeagent(self) -> FreeAgentError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FreeAgentError */
/* -------------------------------------------------------------------------- */

impl IntoFreeAgentError for HttpError {
    fn into_freeagent(self) -> FreeAgentError {
        if self.is_timeout() {
            return FreeAgentError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return FreeAgentError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return FreeAgentError::Config(format!("invalid HTTP request: {self}"));
        }

        FreeAgentError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_freeagent())
    }
}

/* -------------------------------------------------------------------------- */
/* AuthError / OAuthClientError → FreeAgentError */
/* -------------------------------------------------------------------------- */

impl IntoFreeAgentError for AuthError {
    fn into_freeagent(self) -> FreeAgentError {
        FreeAgentError::Auth(self.to_string())
    }
}

impl From<AuthError> for InfraError {
    fn from(value: AuthError) -> Self {
        InfraError(value.into_freeagent())
    }
}

impl IntoFreeAgentError for OAuthClientError {
    fn into_freeagent(self) -> FreeAgentError {
        match self {
            OAuthClientError::RequestFailed(err) => err.into_freeagent(),
            other => FreeAgentError::Auth(other.to_string()),
        }
    }
}

impl From<OAuthClientError> for InfraError {
    fn from(value: OAuthClientError) -> Self {
        InfraError(value.into_freeagent())
    }
}

/* -------------------------------------------------------------------------- */
/* ApiError → FreeAgentError */
/* -------------------------------------------------------------------------- */

impl From<ApiError> for FreeAgentError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::Status { status, url, body } => Self::Api { status, url, body },
            ApiError::Auth(err) => err.into_freeagent(),
            ApiError::Network(message) => Self::Network(message),
            ApiError::Decode(message) => Self::Serialization(message),
            ApiError::Serialization(err) => Self::Serialization(err.to_string()),
            ApiError::Config(message) => Self::Config(message),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
