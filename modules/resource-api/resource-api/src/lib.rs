//! Resource API Module Implementation
//!
//! A generic resource controller that maps GET/POST/PUT/DELETE on a single
//! addressed resource to a [`ResourceModel`], gates mutating verbs behind an
//! [`AccessPolicy`], and shapes every answer into the success/errors envelope.
//!
//! The collaborator contracts live in `resource-api-sdk` and are re-exported here.

pub use resource_api_sdk::{
    AccessPolicy, AccessPolicyError, ApiVerb, Credentials, FieldMap, Identity, Language,
    LanguageResolver, ListQuery, Resource, ResourceId, ResourceModel, ResourceModelError, Section,
};

pub mod module;
pub use module::ResourceApiModule;

pub mod config;
pub use config::ResourceApiConfig;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
