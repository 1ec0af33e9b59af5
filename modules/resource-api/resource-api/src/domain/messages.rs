use std::collections::{BTreeMap, HashMap};

use resource_api_sdk::Language;
use serde::{Deserialize, Serialize};

/// Keys of the user-facing messages the controller emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    ItemNotFound,
    EmptyData,
    ItemSaved,
    NoItemId,
    ItemUpdated,
    ItemDeleted,
    NotFound,
    InvalidData,
    EnterEmailAndPassword,
    AccessAllowed,
    AccessDenied,
}

impl MessageKey {
    /// Built-in English text.
    #[must_use]
    pub fn default_text(self) -> &'static str {
        match self {
            Self::ItemNotFound => "Item not found",
            Self::EmptyData => "No data posted",
            Self::ItemSaved => "Item saved",
            Self::NoItemId => "No item's ID",
            Self::ItemUpdated => "Item updated",
            Self::ItemDeleted => "Item deleted",
            Self::NotFound => "Not found",
            Self::InvalidData => "Invalid data posted",
            Self::EnterEmailAndPassword => "Enter email and password",
            Self::AccessAllowed => "Access allowed",
            Self::AccessDenied => "Access denied",
        }
    }
}

/// Message catalog with per-language overrides.
///
/// Lookup order: requested language, default language, built-in text.
#[derive(Debug, Clone)]
pub struct Messages {
    default_language: Language,
    overrides: HashMap<Language, HashMap<MessageKey, String>>,
}

impl Messages {
    #[must_use]
    pub fn new(default_language: Language) -> Self {
        Self {
            default_language,
            overrides: HashMap::new(),
        }
    }

    #[must_use]
    pub fn from_config(
        default_language: Language,
        overrides: &BTreeMap<String, BTreeMap<MessageKey, String>>,
    ) -> Self {
        let overrides = overrides
            .iter()
            .map(|(lang, texts)| {
                let texts = texts.iter().map(|(k, v)| (*k, v.clone())).collect();
                (Language::new(lang), texts)
            })
            .collect();
        Self {
            default_language,
            overrides,
        }
    }

    #[must_use]
    pub fn text(&self, key: MessageKey, language: &Language) -> &str {
        self.lookup(key, language)
            .or_else(|| self.lookup(key, &self.default_language))
            .unwrap_or_else(|| key.default_text())
    }

    fn lookup(&self, key: MessageKey, language: &Language) -> Option<&str> {
        self.overrides
            .get(language)
            .and_then(|texts| texts.get(&key))
            .map(String::as_str)
    }
}
