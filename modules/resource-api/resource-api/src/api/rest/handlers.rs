use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use resource_api_sdk::{Credentials, FieldMap, attribute_text};

use crate::domain::controller::Reply;
use crate::domain::error::DomainError;
use crate::domain::messages::MessageKey;

use super::dto::{Envelope, HealthDto};
use super::error::domain_error_response;
use super::extract::{FormBody, Target, basic_credentials};
use super::state::ApiState;

fn respond(state: &ApiState, target: &Target, outcome: Result<Reply, DomainError>) -> Response {
    let language = target.ctx.language();
    match outcome {
        Ok(Reply::Item(item)) => Json(item).into_response(),
        Ok(Reply::Collection(items)) => Json(items).into_response(),
        Ok(Reply::Success { message, id }) => {
            let text = state.messages().text(message, language);
            Json(Envelope::success(text, id)).into_response()
        }
        Err(e) => domain_error_response(e, state.messages(), language, &target.instance),
    }
}

pub async fn read(Extension(state): Extension<Arc<ApiState>>, target: Target) -> Response {
    let outcome = target
        .controller
        .read(&target.ctx, target.params.id.clone(), &target.params.list)
        .await;
    respond(&state, &target, outcome)
}

pub async fn create(
    Extension(state): Extension<Arc<ApiState>>,
    target: Target,
    FormBody(data): FormBody,
) -> Response {
    let outcome = target.controller.create(&target.ctx, data).await;
    respond(&state, &target, outcome)
}

pub async fn update(
    Extension(state): Extension<Arc<ApiState>>,
    target: Target,
    FormBody(data): FormBody,
) -> Response {
    let outcome = target
        .controller
        .update(&target.ctx, target.params.id.clone(), data)
        .await;
    respond(&state, &target, outcome)
}

pub async fn delete(Extension(state): Extension<Arc<ApiState>>, target: Target) -> Response {
    let outcome = target
        .controller
        .delete(&target.ctx, target.params.id.clone())
        .await;
    respond(&state, &target, outcome)
}

/// Credentials come from the `email`/`password` body fields, falling back to
/// the `Authorization: Basic` header. A denial is still a 200 here.
pub async fn authenticate(
    Extension(state): Extension<Arc<ApiState>>,
    target: Target,
    headers: axum::http::HeaderMap,
    FormBody(data): FormBody,
) -> Response {
    let credentials = body_credentials(&data)
        .or_else(|| basic_credentials(&headers))
        .unwrap_or_else(|| Credentials::new("", ""));

    match target.controller.authenticate(&credentials).await {
        Err(DomainError::AccessDenied) => {
            let text = state
                .messages()
                .text(MessageKey::AccessDenied, target.ctx.language());
            (StatusCode::OK, Json(Envelope::error(text))).into_response()
        }
        outcome => respond(&state, &target, outcome),
    }
}

fn body_credentials(data: &FieldMap) -> Option<Credentials> {
    if !data.contains_key("email") && !data.contains_key("password") {
        return None;
    }
    let field = |name: &str| data.get(name).map_or_else(String::new, attribute_text);
    Some(Credentials::new(field("email"), field("password")))
}

#[allow(clippy::unused_async)]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_owned(),
    })
}
