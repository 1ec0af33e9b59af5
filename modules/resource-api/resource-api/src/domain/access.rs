use std::sync::Arc;

use resource_api_sdk::{AccessPolicy, AccessPolicyError, ApiVerb, Credentials, Section};
use tracing::debug;

/// Resolves credentials to an identity and checks its permission on a section.
///
/// Unknown credentials and missing permissions are both a plain `false`.
pub struct AccessGate {
    policy: Arc<dyn AccessPolicy>,
    panel: String,
}

impl AccessGate {
    #[must_use]
    pub fn new(policy: Arc<dyn AccessPolicy>, panel: impl Into<String>) -> Self {
        Self {
            policy,
            panel: panel.into(),
        }
    }

    /// # Errors
    /// Returns an error only when the policy backend itself fails.
    pub async fn has_access(
        &self,
        credentials: Option<&Credentials>,
        verb: ApiVerb,
        section: &Section,
    ) -> Result<bool, AccessPolicyError> {
        let Some(credentials) = credentials.filter(|c| c.is_complete()) else {
            debug!(%section, %verb, "no credentials supplied");
            return Ok(false);
        };

        let Some(identity) = self.policy.authenticate(credentials).await? else {
            debug!(%section, %verb, email = %credentials.email, "login check failed");
            return Ok(false);
        };

        let allowed = self
            .policy
            .authorize(&identity, verb, section, &self.panel)
            .await?;
        debug!(
            %section,
            %verb,
            user_id = %identity.user_id,
            panel = %self.panel,
            allowed,
            "permission checked"
        );
        Ok(allowed)
    }
}
