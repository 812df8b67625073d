// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;
use crate::models::usermodel::{NewAccount, ProfileChanges, User};

const USER_COLUMNS: &str =
    "id, name, dob, email, phone_no, password, address, city, pincode, created_at";

#[async_trait]
pub trait UserExt: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error>;

    async fn save_user(&self, account: NewAccount) -> Result<User, sqlx::Error>;

    /// Returns the number of rows touched.
    async fn update_user_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<u64, sqlx::Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn save_user(&self, account: NewAccount) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, dob, email, phone_no, password, address, city, pincode)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(account.name)
        .bind(account.dob)
        .bind(account.email)
        .bind(account.phone_no)
        .bind(account.password_hash)
        .bind(account.address)
        .bind(account.city)
        .bind(account.pincode)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password = $1 WHERE email = $2")
            .bind(password_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                dob = COALESCE($3, dob),
                phone_no = COALESCE($4, phone_no),
                password = COALESCE($5, password),
                address = COALESCE($6, address),
                city = COALESCE($7, city),
                pincode = COALESCE($8, pincode)
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(changes.name.as_deref())
        .bind(changes.dob)
        .bind(changes.phone_no.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.city.as_deref())
        .bind(changes.pincode.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
