use std::collections::HashMap;

use async_trait::async_trait;
use resource_api_sdk::{
    AccessPolicy, AccessPolicyError, ApiVerb, Credentials, Identity, Section,
};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use crate::config::{GrantConfig, GroupConfig, UserConfig};

const WILDCARD: &str = "*";

/// Hex-encoded SHA-256 of `password`, the form stored in `password_sha256`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    email: String,
    password_sha256: String,
    groups: Vec<String>,
}

/// Access policy backed by users and group grants from configuration.
///
/// Emails match case-insensitively. A grant matches when its section is the
/// requested one or `*`, its verbs contain the verb or `*`, and its panel is
/// the requested panel.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessPolicy {
    accounts: HashMap<String, Account>,
    grants: HashMap<String, Vec<GrantConfig>>,
}

impl StaticAccessPolicy {
    #[must_use]
    pub fn from_config(users: &[UserConfig], groups: &[GroupConfig]) -> Self {
        let accounts = users
            .iter()
            .map(|u| {
                let email = u.email.trim().to_owned();
                let account = Account {
                    user_id: u.id.clone().unwrap_or_else(|| email.clone()),
                    email: email.clone(),
                    password_sha256: u.password_sha256.trim().to_ascii_lowercase(),
                    groups: u.groups.clone(),
                };
                (email.to_lowercase(), account)
            })
            .collect();

        let mut grants: HashMap<String, Vec<GrantConfig>> = HashMap::new();
        for group in groups {
            grants
                .entry(group.name.clone())
                .or_default()
                .extend(group.grants.iter().cloned());
        }

        Self { accounts, grants }
    }

    fn grant_matches(grant: &GrantConfig, verb: ApiVerb, section: &Section, panel: &str) -> bool {
        let section_ok = grant.section == WILDCARD || grant.section == section.as_str();
        let verb_ok = grant
            .verbs
            .iter()
            .any(|v| v == WILDCARD || v.eq_ignore_ascii_case(verb.as_str()));
        section_ok && verb_ok && grant.panel == panel
    }
}

#[async_trait]
impl AccessPolicy for StaticAccessPolicy {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<Identity>, AccessPolicyError> {
        let Some(account) = self.accounts.get(&credentials.email.to_lowercase()) else {
            return Ok(None);
        };

        if hash_password(credentials.password.expose_secret()) != account.password_sha256 {
            return Ok(None);
        }

        Ok(Some(Identity {
            user_id: account.user_id.clone(),
            email: account.email.clone(),
            groups: account.groups.clone(),
        }))
    }

    async fn authorize(
        &self,
        identity: &Identity,
        verb: ApiVerb,
        section: &Section,
        panel: &str,
    ) -> Result<bool, AccessPolicyError> {
        Ok(identity
            .groups
            .iter()
            .filter_map(|group| self.grants.get(group))
            .flatten()
            .any(|grant| Self::grant_matches(grant, verb, section, panel)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn grant(section: &str, verbs: &[&str], panel: &str) -> GrantConfig {
        GrantConfig {
            section: section.to_owned(),
            verbs: verbs.iter().map(|v| (*v).to_owned()).collect(),
            panel: panel.to_owned(),
        }
    }

    fn policy() -> StaticAccessPolicy {
        let users = vec![
            UserConfig {
                id: Some("1".to_owned()),
                email: "Admin@Shop.test".to_owned(),
                password_sha256: hash_password("secret"),
                groups: vec!["admins".to_owned()],
            },
            UserConfig {
                id: None,
                email: "editor@shop.test".to_owned(),
                password_sha256: hash_password("pencil"),
                groups: vec!["editors".to_owned()],
            },
        ];
        let groups = vec![
            GroupConfig {
                name: "admins".to_owned(),
                grants: vec![grant("*", &["*"], "admin")],
            },
            GroupConfig {
                name: "editors".to_owned(),
                grants: vec![grant("products", &["GET", "put"], "admin")],
            },
        ];
        StaticAccessPolicy::from_config(&users, &groups)
    }

    #[test]
    fn test_hash_password_is_sha256_hex() {
        assert_eq!(
            hash_password("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[tokio::test]
    async fn test_authenticate_matches_email_case_insensitively() {
        let policy = policy();
        let identity = policy
            .authenticate(&Credentials::new("admin@shop.TEST", "secret"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(identity.user_id, "1");
        assert_eq!(identity.email, "Admin@Shop.test");
        assert_eq!(identity.groups, vec!["admins".to_owned()]);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password_and_unknown_user() {
        let policy = policy();
        assert!(policy
            .authenticate(&Credentials::new("admin@shop.test", "nope"))
            .await
            .unwrap()
            .is_none());
        assert!(policy
            .authenticate(&Credentials::new("ghost@shop.test", "secret"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_user_id_defaults_to_email() {
        let policy = policy();
        let identity = policy
            .authenticate(&Credentials::new("editor@shop.test", "pencil"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.user_id, "editor@shop.test");
    }

    #[tokio::test]
    async fn test_authorize_grants() {
        let policy = policy();
        let editor = policy
            .authenticate(&Credentials::new("editor@shop.test", "pencil"))
            .await
            .unwrap()
            .unwrap();
        let products = Section::new("products");

        assert!(policy.authorize(&editor, ApiVerb::Put, &products, "admin").await.unwrap());
        assert!(policy.authorize(&editor, ApiVerb::Get, &products, "admin").await.unwrap());
        assert!(!policy.authorize(&editor, ApiVerb::Delete, &products, "admin").await.unwrap());
        assert!(!policy
            .authorize(&editor, ApiVerb::Put, &Section::new("orders"), "admin")
            .await
            .unwrap());
        assert!(!policy.authorize(&editor, ApiVerb::Put, &products, "shop").await.unwrap());
    }

    #[tokio::test]
    async fn test_wildcard_grant_covers_every_section_and_verb() {
        let policy = policy();
        let admin = policy
            .authenticate(&Credentials::new("admin@shop.test", "secret"))
            .await
            .unwrap()
            .unwrap();

        for verb in [ApiVerb::Get, ApiVerb::Post, ApiVerb::Put, ApiVerb::Delete] {
            assert!(policy
                .authorize(&admin, verb, &Section::new("orders"), "admin")
                .await
                .unwrap());
        }
    }
}
