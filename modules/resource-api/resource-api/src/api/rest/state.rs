use std::collections::HashMap;
use std::sync::Arc;

use resource_api_sdk::LanguageResolver;

use crate::domain::controller::ResourceController;
use crate::domain::messages::Messages;

/// Everything the REST handlers share: one controller per served path, the
/// language resolver and the message catalog.
pub struct ApiState {
    controllers: HashMap<String, Arc<ResourceController>>,
    languages: Arc<dyn LanguageResolver>,
    messages: Arc<Messages>,
}

impl ApiState {
    #[must_use]
    pub fn new(languages: Arc<dyn LanguageResolver>, messages: Arc<Messages>) -> Self {
        Self {
            controllers: HashMap::new(),
            languages,
            messages,
        }
    }

    /// Serve `controller` under `/api/{path}`. A later registration of the same path wins.
    #[must_use]
    pub fn with_controller(
        mut self,
        path: impl Into<String>,
        controller: Arc<ResourceController>,
    ) -> Self {
        self.controllers.insert(path.into(), controller);
        self
    }

    #[must_use]
    pub fn controller(&self, path: &str) -> Option<&Arc<ResourceController>> {
        self.controllers.get(path)
    }

    /// Served paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    #[must_use]
    pub fn languages(&self) -> &dyn LanguageResolver {
        self.languages.as_ref()
    }

    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}
