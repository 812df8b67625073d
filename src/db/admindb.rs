// db/admindb.rs
use async_trait::async_trait;

use super::DBClient;
use crate::models::usermodel::Administrator;

#[async_trait]
pub trait AdminExt: Send + Sync {
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Administrator>, sqlx::Error>;

    async fn upsert_admin(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<Administrator, sqlx::Error>;
}

#[async_trait]
impl AdminExt for DBClient {
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Administrator>, sqlx::Error> {
        sqlx::query_as::<_, Administrator>(
            "SELECT id, email, password, created_at FROM administrators WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_admin(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<Administrator, sqlx::Error> {
        sqlx::query_as::<_, Administrator>(
            r#"
            INSERT INTO administrators (email, password)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET password = EXCLUDED.password
            RETURNING id, email, password, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }
}
