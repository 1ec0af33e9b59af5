use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use resource_api_sdk::{ApiVerb, Language};

use crate::domain::error::DomainError;
use crate::domain::messages::Messages;

use super::dto::Envelope;
use super::problem::Problem;

/// HTTP status of an error rendered as an `errors` envelope.
#[must_use]
pub fn status_of(e: &DomainError) -> StatusCode {
    match e {
        DomainError::MissingId {
            verb: ApiVerb::Delete,
        } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } | DomainError::MissingId { .. } => StatusCode::NOT_FOUND,
        DomainError::AccessDenied => StatusCode::FORBIDDEN,
        DomainError::EmptyInput
        | DomainError::ValidationFailed(_)
        | DomainError::CredentialsMissing => StatusCode::OK,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a domain error: an `errors` envelope in `language`, or a 500 problem
/// for failures the controller does not translate.
pub fn domain_error_response(
    e: DomainError,
    messages: &Messages,
    language: &Language,
    instance: &str,
) -> Response {
    let status = status_of(&e);
    let envelope = match e {
        DomainError::Internal(inner) => {
            tracing::error!(error = ?inner, %instance, "resource request failed");
            return Problem::internal().with_instance(instance).into_response();
        }
        DomainError::ValidationFailed(list) if !list.is_empty() => Envelope::Errors(list),
        other => Envelope::error(
            other
                .message_key()
                .map_or_else(|| other.to_string(), |key| messages.text(key, language).to_owned()),
        ),
    };
    (status, Json(envelope)).into_response()
}
