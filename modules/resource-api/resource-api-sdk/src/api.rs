//! Collaborator contracts consumed by the resource controller.

use async_trait::async_trait;

use crate::errors::{AccessPolicyError, ResourceModelError};
use crate::models::{
    ApiVerb, Credentials, FieldMap, Identity, Language, LanguageHints, ListQuery, Resource,
    ResourceId, Section,
};

/// CRUD persistence for one resource type.
#[async_trait]
pub trait ResourceModel: Send + Sync {
    /// Fetch one record, `None` when the key is unknown.
    async fn get_one_by_id(&self, id: &ResourceId) -> Result<Option<Resource>, ResourceModelError>;

    /// Fetch the records matching `query`, in key order.
    async fn get(&self, query: &ListQuery) -> Result<Vec<Resource>, ResourceModelError>;

    /// Validate and persist `data`.
    ///
    /// Without `id` a new record is created; with `id` the existing record's
    /// attributes are replaced. Returns the key of the stored record.
    async fn store_form(
        &self,
        data: FieldMap,
        id: Option<&ResourceId>,
    ) -> Result<ResourceId, ResourceModelError>;

    async fn exists_id(&self, id: &ResourceId) -> Result<bool, ResourceModelError>;

    async fn delete_id(&self, id: &ResourceId) -> Result<(), ResourceModelError>;
}

/// Identity resolution and per-section permission checks.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Resolve credentials to a principal, `None` when they do not match.
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<Identity>, AccessPolicyError>;

    /// Whether `identity` may issue `verb` against `section` within `panel`.
    async fn authorize(
        &self,
        identity: &Identity,
        verb: ApiVerb,
        section: &Section,
        panel: &str,
    ) -> Result<bool, AccessPolicyError>;
}

/// Picks the interface language of a request.
pub trait LanguageResolver: Send + Sync {
    fn resolve(&self, hints: &LanguageHints) -> Language;

    fn default_language(&self) -> Language;
}
