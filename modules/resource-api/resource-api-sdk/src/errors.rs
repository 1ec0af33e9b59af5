//! Error types for the resource API collaborators.

use thiserror::Error;

use crate::models::ResourceId;

/// Failures reported by a [`ResourceModel`](crate::api::ResourceModel).
#[derive(Error, Debug)]
pub enum ResourceModelError {
    /// Field validation rejected the submitted data. Messages keep rule order.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// An update addressed a record that does not exist.
    #[error("resource not found: {id}")]
    NotFound { id: ResourceId },

    /// Anything the backing store could not handle.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ResourceModelError {
    #[must_use]
    pub fn validation(messages: Vec<String>) -> Self {
        Self::Validation(messages)
    }

    #[must_use]
    pub fn not_found(id: ResourceId) -> Self {
        Self::NotFound { id }
    }
}

/// Failures of an [`AccessPolicy`](crate::api::AccessPolicy) backend.
///
/// A denied check is not an error; it is `Ok(None)` / `Ok(false)`.
#[derive(Error, Debug)]
pub enum AccessPolicyError {
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
