// db/otpdb.rs
use async_trait::async_trait;

use super::DBClient;
use crate::models::otpmodel::OtpRecord;

#[async_trait]
pub trait OtpExt: Send + Sync {
    /// Inserts or overwrites the single OTP slot for `email`.
    async fn upsert_otp(&self, email: &str, otp: i32) -> Result<OtpRecord, sqlx::Error>;

    async fn get_otp(&self, email: &str) -> Result<Option<OtpRecord>, sqlx::Error>;

    async fn delete_otp(&self, email: &str) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl OtpExt for DBClient {
    async fn upsert_otp(&self, email: &str, otp: i32) -> Result<OtpRecord, sqlx::Error> {
        sqlx::query_as::<_, OtpRecord>(
            r#"
            INSERT INTO otp_verifications (email, otp, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (email) DO UPDATE SET otp = EXCLUDED.otp, created_at = NOW()
            RETURNING email, otp, created_at
            "#,
        )
        .bind(email)
        .bind(otp)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_otp(&self, email: &str) -> Result<Option<OtpRecord>, sqlx::Error> {
        sqlx::query_as::<_, OtpRecord>(
            "SELECT email, otp, created_at FROM otp_verifications WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_otp(&self, email: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM otp_verifications WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
