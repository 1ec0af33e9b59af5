//! Request extractors: the addressed resource, per-request context and the submitted body.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use resource_api_sdk::{Credentials, FieldMap, LanguageHints, ListQuery, ResourceId};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::context::RequestContext;
use crate::domain::controller::ResourceController;

use super::problem::Problem;
use super::state::ApiState;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Deserialize)]
struct ResourcePath {
    resource: String,
    #[serde(default)]
    lang: Option<String>,
}

/// Query parameters split into the reserved ones and filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pub id: Option<ResourceId>,
    pub lang: Option<String>,
    pub list: ListQuery,
}

impl RequestParams {
    /// `id`, `lang`, `limit` and `offset` are reserved; every other pair is an
    /// exact-match filter. Blank `id` counts as absent.
    ///
    /// # Errors
    /// `limit` or `offset` that is not a non-negative integer.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, Problem> {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "id" => params.id = Some(ResourceId::new(value)).filter(|id| !id.is_empty()),
                "lang" => params.lang = Some(value),
                "limit" => params.list.limit = Some(parse_count("limit", &value)?),
                "offset" => params.list.offset = parse_count("offset", &value)?,
                _ => params.list.filter.insert(key, value),
            }
        }
        Ok(params)
    }
}

fn parse_count(name: &str, value: &str) -> Result<usize, Problem> {
    value
        .trim()
        .parse()
        .map_err(|_| Problem::bad_request(format!("'{name}' must be a non-negative integer")))
}

/// Credentials from an `Authorization: Basic` header, `None` when absent or malformed.
#[must_use]
pub fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some(Credentials::new(email, password))
}

/// The controller addressed by `{resource}` plus everything derived from the request head.
pub struct Target {
    pub controller: Arc<ResourceController>,
    pub ctx: RequestContext,
    pub params: RequestParams,
    pub instance: String,
}

impl<S> FromRequestParts<S> for Target
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let instance = parts.uri.path().to_owned();

        let Extension(api) = Extension::<Arc<ApiState>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "resource API state is not installed");
                Problem::internal().with_instance(&instance)
            })?;

        let Path(path) = Path::<ResourcePath>::from_request_parts(parts, state)
            .await
            .map_err(|e| Problem::bad_request(e.body_text()).with_instance(&instance))?;

        let Some(controller) = api.controller(&path.resource).cloned() else {
            return Err(
                Problem::not_found(format!("unknown resource '{}'", path.resource))
                    .with_instance(&instance),
            );
        };

        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(parts.uri.query().unwrap_or_default())
                .map_err(|e| Problem::bad_request(e.to_string()).with_instance(&instance))?;
        let params = RequestParams::from_pairs(pairs).map_err(|p| p.with_instance(&instance))?;

        let hints = LanguageHints {
            path_segment: path.lang,
            query: params.lang.clone(),
            accept_language: parts
                .headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        };
        let language = api.languages().resolve(&hints);

        Ok(Self {
            controller,
            ctx: RequestContext::new(language, basic_credentials(&parts.headers)),
            params,
            instance,
        })
    }
}

/// Submitted field map, from a JSON object or a URL-encoded form. An empty body is an empty map.
#[derive(Debug, Clone, Default)]
pub struct FormBody(pub FieldMap);

impl<S> FromRequest<S> for FormBody
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Problem::bad_request(e.body_text()).with_instance(&instance))?;

        parse_body(&bytes, is_form)
            .map(Self)
            .map_err(|p| p.with_instance(&instance))
    }
}

/// # Errors
/// Malformed form or JSON, or JSON that is not an object.
pub fn parse_body(bytes: &[u8], is_form: bool) -> Result<FieldMap, Problem> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(FieldMap::new());
    }

    if is_form {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)
            .map_err(|e| Problem::bad_request(format!("malformed form body: {e}")))?;
        return Ok(pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Problem::bad_request("request body must be a JSON object")),
        Err(e) => Err(Problem::bad_request(format!("malformed JSON body: {e}"))),
    }
}
