//! Resource API SDK
//!
//! Contracts shared by the generic resource controller and the collaborators it
//! is wired with:
//! - [`ResourceModel`]: CRUD persistence for one resource type
//! - [`AccessPolicy`]: identity resolution and per-section permissions
//! - [`LanguageResolver`]: per-request interface language
//!
//! plus the models passed across those seams.

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::{AccessPolicy, LanguageResolver, ResourceModel};
pub use errors::{AccessPolicyError, ResourceModelError};
pub use models::{
    ApiVerb, Credentials, DEFAULT_PANEL, FieldMap, FilterCriteria, Identity, Language,
    LanguageHints, ListQuery, Resource, ResourceId, Section, attribute_text,
};
