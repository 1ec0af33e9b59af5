use std::collections::BTreeMap;

use resource_api_sdk::DEFAULT_PANEL;
use serde::{Deserialize, Serialize};

use crate::domain::messages::MessageKey;

/// Configuration of the resource API module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceApiConfig {
    /// Panel passed to every permission check.
    #[serde(default = "default_panel")]
    pub panel: String,

    /// Gate GET behind the access policy as well.
    #[serde(default)]
    pub protect_reads: bool,

    #[serde(default)]
    pub languages: LanguageConfig,

    /// Per-language message overrides: `language -> message key -> text`.
    #[serde(default)]
    pub messages: BTreeMap<String, BTreeMap<MessageKey, String>>,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub resources: Vec<ResourceConfig>,

    #[serde(default)]
    pub users: Vec<UserConfig>,

    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

impl Default for ResourceApiConfig {
    fn default() -> Self {
        Self {
            panel: default_panel(),
            protect_reads: false,
            languages: LanguageConfig::default(),
            messages: BTreeMap::new(),
            storage: StorageConfig::default(),
            resources: Vec::new(),
            users: Vec::new(),
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    #[serde(default = "default_language")]
    pub default: String,
    #[serde(default = "default_supported_languages")]
    pub supported: Vec<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: default_language(),
            supported: default_supported_languages(),
        }
    }
}

/// Where resource models keep their records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    Memory,
    Sqlite {
        #[serde(default = "default_sqlite_dsn")]
        dsn: String,
    },
}

/// One served resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    /// Model identifier, e.g. `products_model`. The section is derived from it.
    pub model: String,
    /// URL segment under `/api/`. Defaults to the section name.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

/// Validation rule for one submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRule {
    pub name: String,
    /// Human-readable field name used in messages. Defaults to `name`.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl FieldRule {
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    /// Hex-encoded SHA-256 of the password.
    pub password_sha256: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub grants: Vec<GrantConfig>,
}

/// Permission of a group over one section. `*` matches any section or verb.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantConfig {
    pub section: String,
    pub verbs: Vec<String>,
    #[serde(default = "default_panel")]
    pub panel: String,
}

fn default_panel() -> String {
    DEFAULT_PANEL.to_owned()
}

fn default_language() -> String {
    "en".to_owned()
}

fn default_supported_languages() -> Vec<String> {
    vec![default_language()]
}

fn default_sqlite_dsn() -> String {
    "sqlite::memory:".to_owned()
}
