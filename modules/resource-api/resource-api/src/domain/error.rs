use resource_api_sdk::{AccessPolicyError, ApiVerb};
use thiserror::Error;

use super::messages::MessageKey;

/// Outcomes of a controller operation that are not a success.
#[derive(Error, Debug)]
pub enum DomainError {
    /// An addressed record does not exist.
    #[error("{verb} target not found")]
    NotFound { verb: ApiVerb },

    /// The verb needs an `id` and none was supplied.
    #[error("{verb} requires an id")]
    MissingId { verb: ApiVerb },

    /// The model rejected the data. An empty list renders as `invalid_data`.
    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("no data posted")]
    EmptyInput,

    #[error("access denied")]
    AccessDenied,

    #[error("email or password missing")]
    CredentialsMissing,

    /// Collaborator failure the controller does not translate.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn not_found(verb: ApiVerb) -> Self {
        Self::NotFound { verb }
    }

    #[must_use]
    pub fn missing_id(verb: ApiVerb) -> Self {
        Self::MissingId { verb }
    }

    /// Catalog key of the single user-facing message, if the error has one.
    ///
    /// A non-empty `ValidationFailed` carries its own messages and `Internal` is never shown.
    #[must_use]
    pub fn message_key(&self) -> Option<MessageKey> {
        match self {
            Self::NotFound {
                verb: ApiVerb::Delete,
            } => Some(MessageKey::NotFound),
            Self::NotFound { .. } => Some(MessageKey::ItemNotFound),
            Self::MissingId { .. } => Some(MessageKey::NoItemId),
            Self::EmptyInput => Some(MessageKey::EmptyData),
            Self::AccessDenied => Some(MessageKey::AccessDenied),
            Self::CredentialsMissing => Some(MessageKey::EnterEmailAndPassword),
            Self::ValidationFailed(messages) if messages.is_empty() => {
                Some(MessageKey::InvalidData)
            }
            Self::ValidationFailed(_) | Self::Internal(_) => None,
        }
    }
}

impl From<AccessPolicyError> for DomainError {
    fn from(e: AccessPolicyError) -> Self {
        match e {
            AccessPolicyError::Backend(inner) => Self::Internal(inner),
        }
    }
}
