use resource_api_sdk::{Language, LanguageHints, LanguageResolver};

use crate::config::LanguageConfig;

/// Resolves the request language against a fixed set of supported languages.
///
/// Hints are tried in order: path segment, `lang` query parameter, then each
/// `Accept-Language` entry by its primary subtag. The first supported one wins.
#[derive(Debug, Clone)]
pub struct ConfiguredLanguageResolver {
    default: Language,
    supported: Vec<Language>,
}

impl ConfiguredLanguageResolver {
    #[must_use]
    pub fn new(default: Language, supported: Vec<Language>) -> Self {
        Self { default, supported }
    }

    #[must_use]
    pub fn from_config(cfg: &LanguageConfig) -> Self {
        let default = Language::new(&cfg.default);
        let mut supported: Vec<Language> = cfg.supported.iter().map(|l| Language::new(l)).collect();
        if !supported.contains(&default) {
            supported.push(default.clone());
        }
        Self::new(default, supported)
    }

    fn pick(&self, code: &str) -> Option<Language> {
        let lang = Language::new(code);
        self.supported.contains(&lang).then_some(lang)
    }

    fn match_accept_language(&self, header: &str) -> Option<Language> {
        header
            .split(',')
            .filter_map(|entry| entry.split(';').next())
            .map(|tag| tag.split('-').next().unwrap_or(tag).trim())
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .find_map(|tag| self.pick(tag))
    }
}

impl LanguageResolver for ConfiguredLanguageResolver {
    fn resolve(&self, hints: &LanguageHints) -> Language {
        hints
            .path_segment
            .as_deref()
            .and_then(|code| self.pick(code))
            .or_else(|| hints.query.as_deref().and_then(|code| self.pick(code)))
            .or_else(|| {
                hints
                    .accept_language
                    .as_deref()
                    .and_then(|header| self.match_accept_language(header))
            })
            .unwrap_or_else(|| self.default.clone())
    }

    fn default_language(&self) -> Language {
        self.default.clone()
    }
}
