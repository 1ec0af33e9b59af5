use std::sync::Arc;

use anyhow::{Context, bail};
use axum::Router;
use resource_api_sdk::{AccessPolicy, LanguageResolver, ResourceModel, Section};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::api::rest::state::ApiState;
use crate::config::{ResourceApiConfig, ResourceConfig, StorageConfig};
use crate::domain::access::AccessGate;
use crate::domain::controller::ResourceController;
use crate::domain::messages::Messages;
use crate::infra::lang::ConfiguredLanguageResolver;
use crate::infra::policy::StaticAccessPolicy;
use crate::infra::storage::{InMemoryResourceModel, SeaOrmResourceModel, sea_orm_repo};

/// The resource API, wired from configuration and ready to serve.
pub struct ResourceApiModule {
    state: Arc<ApiState>,
}

impl ResourceApiModule {
    /// Build every configured resource controller over a shared access gate.
    ///
    /// # Errors
    /// Storage connection or migration failures, and invalid resource paths.
    pub async fn from_config(cfg: &ResourceApiConfig) -> anyhow::Result<Self> {
        info!("Initializing resource API module");

        let policy: Arc<dyn AccessPolicy> =
            Arc::new(StaticAccessPolicy::from_config(&cfg.users, &cfg.groups));
        let gate = Arc::new(AccessGate::new(policy, cfg.panel.clone()));

        let db = match &cfg.storage {
            StorageConfig::Memory => None,
            StorageConfig::Sqlite { dsn } => Some(sea_orm_repo::connect(dsn).await?),
        };

        let resolver = ConfiguredLanguageResolver::from_config(&cfg.languages);
        let messages = Messages::from_config(resolver.default_language(), &cfg.messages);
        let mut state = ApiState::new(Arc::new(resolver), Arc::new(messages));

        for resource in &cfg.resources {
            let (path, controller) = build_controller(resource, db.as_ref(), &gate, cfg)
                .with_context(|| format!("invalid resource '{}'", resource.model))?;
            if state.controller(&path).is_some() {
                bail!("resource path '{path}' is configured twice");
            }
            info!(%path, section = %controller.section(), "resource registered");
            state = state.with_controller(path, Arc::new(controller));
        }

        info!(
            resources = cfg.resources.len(),
            panel = %cfg.panel,
            "Resource API module initialized"
        );
        Ok(Self::new(Arc::new(state)))
    }

    #[must_use]
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn state(&self) -> &Arc<ApiState> {
        &self.state
    }

    #[must_use]
    pub fn router(&self) -> Router {
        debug!(paths = ?self.state.paths(), "registering resource routes");
        routes::router(Arc::clone(&self.state))
    }
}

fn build_controller(
    resource: &ResourceConfig,
    db: Option<&DatabaseConnection>,
    gate: &Arc<AccessGate>,
    cfg: &ResourceApiConfig,
) -> anyhow::Result<(String, ResourceController)> {
    let section = Section::from_model_name(&resource.model);
    if section.as_str().is_empty() {
        bail!("model name yields an empty section");
    }

    let path = resource
        .path
        .clone()
        .unwrap_or_else(|| section.to_string());
    if path.is_empty() || path.contains('/') {
        bail!("path '{path}' must be a single non-empty segment");
    }

    let model: Arc<dyn ResourceModel> = match db {
        Some(db) => Arc::new(SeaOrmResourceModel::new(
            db.clone(),
            section.clone(),
            resource.fields.clone(),
        )),
        None => Arc::new(InMemoryResourceModel::new(
            section.clone(),
            resource.fields.clone(),
        )),
    };

    let controller = ResourceController::new(section, model, Arc::clone(gate))
        .with_protected_reads(cfg.protect_reads);
    Ok((path, controller))
}
