//! Role lookups against `user_roles`

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::RoleStore;
use crate::{error::AppResult, models::AppRole};

#[derive(Clone)]
pub struct RolesRepository {
    pool: Pool<Postgres>,
}

impl RolesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for RolesRepository {
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
