//! Authorization policy for admin-only operations

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{AppRole, CurrentUser},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorizationPolicy {
    repository: Repository,
    /// Legacy super-admin identities, lowercased. A named exception to the
    /// role table, removable through configuration alone.
    legacy_admin_emails: Vec<String>,
}

impl AuthorizationPolicy {
    pub fn new(repository: Repository, config: &AuthConfig) -> Self {
        Self {
            repository,
            legacy_admin_emails: config
                .legacy_admin_emails
                .iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn is_legacy_admin(&self, user: &CurrentUser) -> bool {
        let email = user.email.trim().to_lowercase();
        self.legacy_admin_emails.iter().any(|e| *e == email)
    }

    /// `hasRole(user, admin)` or a legacy super-admin identity
    pub async fn is_admin(&self, user: &CurrentUser) -> AppResult<bool> {
        if self.is_legacy_admin(user) {
            tracing::debug!(user_id = %user.id, "Admin access through legacy identity");
            return Ok(true);
        }
        self.repository.roles.has_role(user.id, AppRole::Admin).await
    }

    /// Require admin privileges
    pub async fn require_admin(&self, user: &CurrentUser) -> AppResult<()> {
        if self.is_admin(user).await? {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use uuid::Uuid;

    fn user(email: &str) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
        }
    }

    fn config(emails: &[&str]) -> AuthConfig {
        AuthConfig {
            legacy_admin_emails: emails.iter().map(|e| e.to_string()).collect(),
            ..AuthConfig::default()
        }
    }

    #[tokio::test]
    async fn test_role_grants_admin() {
        let store = MemoryStore::new();
        let admin = user("staff@library.org");
        store.grant_role(admin.id, AppRole::Admin).await;
        let policy = AuthorizationPolicy::new(Repository::in_memory(store), &config(&[]));

        assert!(policy.is_admin(&admin).await.unwrap());
        assert!(!policy.is_admin(&user("visitor@x.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_role_is_not_admin() {
        let store = MemoryStore::new();
        let member = user("member@x.com");
        store.grant_role(member.id, AppRole::User).await;
        let policy = AuthorizationPolicy::new(Repository::in_memory(store), &config(&[]));

        let err = policy.require_admin(&member).await.unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_legacy_identity_is_admin_without_role() {
        let policy = AuthorizationPolicy::new(
            Repository::in_memory(MemoryStore::new()),
            &config(&["Founder@Library.org"]),
        );
        assert!(policy.is_admin(&user("founder@library.org")).await.unwrap());
    }

    #[tokio::test]
    async fn test_removing_legacy_identity_revokes_access() {
        let policy =
            AuthorizationPolicy::new(Repository::in_memory(MemoryStore::new()), &config(&[]));
        assert!(!policy.is_admin(&user("founder@library.org")).await.unwrap());
    }
}
