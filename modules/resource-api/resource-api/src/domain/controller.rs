use std::sync::Arc;

use resource_api_sdk::{
    ApiVerb, Credentials, FieldMap, ListQuery, Resource, ResourceId, ResourceModel,
    ResourceModelError, Section,
};
use tracing::{debug, info, warn};

use super::access::AccessGate;
use super::context::RequestContext;
use super::error::DomainError;
use super::messages::MessageKey;

/// Successful controller outcome, before it is rendered for the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A single record, returned as is.
    Item(Resource),
    /// A filtered collection, possibly empty.
    Collection(Vec<Resource>),
    /// `{success: {message, id?}}`.
    Success {
        message: MessageKey,
        id: Option<ResourceId>,
    },
}

impl Reply {
    fn success(message: MessageKey) -> Self {
        Self::Success { message, id: None }
    }
}

/// Uniform CRUD contract over one backing [`ResourceModel`].
///
/// Holds no per-request state; everything request-specific comes in through
/// [`RequestContext`].
pub struct ResourceController {
    section: Section,
    model: Arc<dyn ResourceModel>,
    gate: Arc<AccessGate>,
    protect_reads: bool,
}

impl ResourceController {
    #[must_use]
    pub fn new(section: Section, model: Arc<dyn ResourceModel>, gate: Arc<AccessGate>) -> Self {
        Self {
            section,
            model,
            gate,
            protect_reads: false,
        }
    }

    /// Also gate GET behind the access policy.
    #[must_use]
    pub fn with_protected_reads(mut self, protect_reads: bool) -> Self {
        self.protect_reads = protect_reads;
        self
    }

    #[must_use]
    pub fn section(&self) -> &Section {
        &self.section
    }

    /// GET: one record by `id`, or the filtered collection.
    ///
    /// # Errors
    /// `NotFound` for an unknown `id`; `AccessDenied` when reads are protected.
    pub async fn read(
        &self,
        ctx: &RequestContext,
        id: Option<ResourceId>,
        query: &ListQuery,
    ) -> Result<Reply, DomainError> {
        self.ensure_access(ctx, ApiVerb::Get).await?;

        if let Some(id) = id {
            debug!(section = %self.section, %id, "fetching item");
            return match self.model.get_one_by_id(&id).await.map_err(internal)? {
                Some(item) => Ok(Reply::Item(item)),
                None => Err(DomainError::not_found(ApiVerb::Get)),
            };
        }

        let items = self.model.get(query).await.map_err(internal)?;
        debug!(section = %self.section, count = items.len(), "listing items");
        Ok(Reply::Collection(items))
    }

    /// POST: create a record from `data`.
    ///
    /// # Errors
    /// `AccessDenied`, `EmptyInput` or `ValidationFailed`.
    pub async fn create(&self, ctx: &RequestContext, data: FieldMap) -> Result<Reply, DomainError> {
        self.ensure_access(ctx, ApiVerb::Post).await?;

        if carries_no_fields(&data) {
            return Err(DomainError::EmptyInput);
        }

        let id = self
            .model
            .store_form(data, None)
            .await
            .map_err(|e| store_error(e, ApiVerb::Post))?;
        info!(section = %self.section, %id, "item saved");
        Ok(Reply::Success {
            message: MessageKey::ItemSaved,
            id: Some(id),
        })
    }

    /// PUT: replace the attributes of record `id`.
    ///
    /// # Errors
    /// `AccessDenied`, `MissingId`, `EmptyInput`, `NotFound` or `ValidationFailed`.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Option<ResourceId>,
        data: FieldMap,
    ) -> Result<Reply, DomainError> {
        self.ensure_access(ctx, ApiVerb::Put).await?;

        let Some(id) = id else {
            return Err(DomainError::missing_id(ApiVerb::Put));
        };

        if carries_no_fields(&data) {
            return Err(DomainError::EmptyInput);
        }

        self.model
            .store_form(data, Some(&id))
            .await
            .map_err(|e| store_error(e, ApiVerb::Put))?;
        info!(section = %self.section, %id, "item updated");
        Ok(Reply::success(MessageKey::ItemUpdated))
    }

    /// DELETE: remove record `id`.
    ///
    /// # Errors
    /// `AccessDenied`, `MissingId` or `NotFound`.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: Option<ResourceId>,
    ) -> Result<Reply, DomainError> {
        self.ensure_access(ctx, ApiVerb::Delete).await?;

        let Some(id) = id else {
            return Err(DomainError::missing_id(ApiVerb::Delete));
        };

        if !self.model.exists_id(&id).await.map_err(internal)? {
            return Err(DomainError::not_found(ApiVerb::Delete));
        }

        self.model.delete_id(&id).await.map_err(internal)?;
        info!(section = %self.section, %id, "item deleted");
        Ok(Reply::success(MessageKey::ItemDeleted))
    }

    /// Credentials check against this resource's section, as a POST.
    ///
    /// # Errors
    /// `CredentialsMissing` without reaching the policy, or `AccessDenied`.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Reply, DomainError> {
        if !credentials.is_complete() {
            return Err(DomainError::CredentialsMissing);
        }

        if self
            .gate
            .has_access(Some(credentials), ApiVerb::Post, &self.section)
            .await?
        {
            info!(section = %self.section, email = %credentials.email, "access allowed");
            Ok(Reply::success(MessageKey::AccessAllowed))
        } else {
            warn!(section = %self.section, email = %credentials.email, "access denied");
            Err(DomainError::AccessDenied)
        }
    }

    async fn ensure_access(&self, ctx: &RequestContext, verb: ApiVerb) -> Result<(), DomainError> {
        if !verb.is_mutating() && !self.protect_reads {
            return Ok(());
        }

        if self
            .gate
            .has_access(ctx.credentials(), verb, &self.section)
            .await?
        {
            Ok(())
        } else {
            warn!(section = %self.section, %verb, "request rejected by access policy");
            Err(DomainError::AccessDenied)
        }
    }
}

/// Submitted data with nothing besides the key has nothing to store.
fn carries_no_fields(data: &FieldMap) -> bool {
    data.keys().all(|key| key == "id")
}

fn internal(e: ResourceModelError) -> DomainError {
    match e {
        ResourceModelError::Storage(inner) => DomainError::Internal(inner),
        other => DomainError::Internal(anyhow::Error::new(other)),
    }
}

fn store_error(e: ResourceModelError, verb: ApiVerb) -> DomainError {
    match e {
        ResourceModelError::Validation(messages) => {
            DomainError::ValidationFailed(clean_messages(messages))
        }
        ResourceModelError::NotFound { .. } => DomainError::not_found(verb),
        ResourceModelError::Storage(inner) => DomainError::Internal(inner),
    }
}

/// Trims messages and drops blank entries.
fn clean_messages(messages: Vec<String>) -> Vec<String> {
    messages
        .into_iter()
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
        .collect()
}
