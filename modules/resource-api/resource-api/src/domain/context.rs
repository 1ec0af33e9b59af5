use resource_api_sdk::{Credentials, Language};

/// Per-request scratch state: the resolved interface language and whatever
/// credentials the client sent.
#[derive(Debug)]
pub struct RequestContext {
    language: Language,
    credentials: Option<Credentials>,
}

impl RequestContext {
    #[must_use]
    pub fn new(language: Language, credentials: Option<Credentials>) -> Self {
        Self {
            language,
            credentials,
        }
    }

    #[must_use]
    pub fn anonymous(language: Language) -> Self {
        Self::new(language, None)
    }

    #[must_use]
    pub fn language(&self) -> &Language {
        &self.language
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
