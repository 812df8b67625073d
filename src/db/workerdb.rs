// db/workerdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;
use crate::models::{
    usermodel::{NewAccount, ProfileChanges},
    workermodel::{WorkerApplication, WorkerSummary},
};

const WORKER_COLUMNS: &str = "id, name, dob, email, password, phone_no, address, city, pincode, \
     types_of_professions, file_name, file_path, is_verified, created_at";

#[async_trait]
pub trait WorkerExt: Send + Sync {
    /// Inserts a new application. The verification flag is always `pending`.
    async fn save_worker_application(
        &self,
        account: NewAccount,
        professions: String,
        file_name: String,
        file_path: String,
    ) -> Result<WorkerApplication, sqlx::Error>;

    async fn get_worker(&self, worker_id: Uuid) -> Result<Option<WorkerApplication>, sqlx::Error>;

    async fn get_verified_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Option<WorkerApplication>, sqlx::Error>;

    async fn get_worker_by_email(
        &self,
        email: &str,
    ) -> Result<Option<WorkerApplication>, sqlx::Error>;

    async fn get_worker_applications(&self) -> Result<Vec<WorkerApplication>, sqlx::Error>;

    /// Case-insensitive substring match against each of a verified worker's
    /// profession tags.
    async fn search_verified_workers(
        &self,
        profession: &str,
    ) -> Result<Vec<WorkerSummary>, sqlx::Error>;

    async fn verify_worker(&self, worker_id: Uuid) -> Result<u64, sqlx::Error>;

    /// Moves the applicant's email to the rejection ledger and deletes the
    /// application as one unit. Workers with booking history are left alone.
    async fn reject_worker(&self, worker_id: Uuid) -> Result<RejectOutcome, sqlx::Error>;

    async fn is_rejected_worker(&self, email: &str) -> Result<bool, sqlx::Error>;

    async fn update_worker_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<u64, sqlx::Error>;

    async fn update_worker_profile(
        &self,
        worker_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectOutcome {
    Rejected(String),
    NotFound,
    HasBookings,
}

/// Escapes LIKE metacharacters so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl WorkerExt for DBClient {
    async fn save_worker_application(
        &self,
        account: NewAccount,
        professions: String,
        file_name: String,
        file_path: String,
    ) -> Result<WorkerApplication, sqlx::Error> {
        sqlx::query_as::<_, WorkerApplication>(&format!(
            r#"
            INSERT INTO worker_applications
                (id, name, dob, email, password, phone_no, address, city, pincode,
                 types_of_professions, file_name, file_path, is_verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending')
            RETURNING {}
            "#,
            WORKER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(account.name)
        .bind(account.dob)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(account.phone_no)
        .bind(account.address)
        .bind(account.city)
        .bind(account.pincode)
        .bind(professions)
        .bind(file_name)
        .bind(file_path)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_worker(&self, worker_id: Uuid) -> Result<Option<WorkerApplication>, sqlx::Error> {
        sqlx::query_as::<_, WorkerApplication>(&format!(
            "SELECT {} FROM worker_applications WHERE id = $1",
            WORKER_COLUMNS
        ))
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_verified_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Option<WorkerApplication>, sqlx::Error> {
        sqlx::query_as::<_, WorkerApplication>(&format!(
            "SELECT {} FROM worker_applications WHERE id = $1 AND is_verified = 'true'",
            WORKER_COLUMNS
        ))
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_worker_by_email(
        &self,
        email: &str,
    ) -> Result<Option<WorkerApplication>, sqlx::Error> {
        sqlx::query_as::<_, WorkerApplication>(&format!(
            "SELECT {} FROM worker_applications WHERE email = $1",
            WORKER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_worker_applications(&self) -> Result<Vec<WorkerApplication>, sqlx::Error> {
        sqlx::query_as::<_, WorkerApplication>(&format!(
            "SELECT {} FROM worker_applications ORDER BY created_at DESC",
            WORKER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn search_verified_workers(
        &self,
        profession: &str,
    ) -> Result<Vec<WorkerSummary>, sqlx::Error> {
        sqlx::query_as::<_, WorkerSummary>(
            r#"
            SELECT id, name, email, phone_no, city, types_of_professions
            FROM worker_applications
            WHERE is_verified = 'true'
              AND EXISTS (
                  SELECT 1
                  FROM unnest(string_to_array(types_of_professions, ',')) AS tag
                  WHERE LOWER(TRIM(tag)) LIKE '%' || LOWER($1) || '%' ESCAPE '\'
              )
            ORDER BY name
            "#,
        )
        .bind(escape_like(profession))
        .fetch_all(&self.pool)
        .await
    }

    async fn verify_worker(&self, worker_id: Uuid) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE worker_applications SET is_verified = 'true' WHERE id = $1")
                .bind(worker_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn reject_worker(&self, worker_id: Uuid) -> Result<RejectOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // the row lock also blocks new bookings, whose FK check needs a key share lock
        let email: Option<String> = sqlx::query_scalar(
            "SELECT email FROM worker_applications WHERE id = $1 FOR UPDATE",
        )
        .bind(worker_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(email) = email else {
            tx.rollback().await?;
            return Ok(RejectOutcome::NotFound);
        };

        let has_bookings: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bookings WHERE worker_id = $1)")
                .bind(worker_id)
                .fetch_one(&mut *tx)
                .await?;

        if has_bookings {
            tx.rollback().await?;
            return Ok(RejectOutcome::HasBookings);
        }

        sqlx::query("INSERT INTO worker_application_rejected (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
            .bind(&email)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM worker_applications WHERE id = $1")
            .bind(worker_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(RejectOutcome::Rejected(email))
    }

    async fn is_rejected_worker(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM worker_application_rejected WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_worker_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE worker_applications SET password = $1 WHERE email = $2")
            .bind(password_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_worker_profile(
        &self,
        worker_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE worker_applications SET
                name = COALESCE($2, name),
                dob = COALESCE($3, dob),
                phone_no = COALESCE($4, phone_no),
                password = COALESCE($5, password),
                address = COALESCE($6, address),
                city = COALESCE($7, city),
                pincode = COALESCE($8, pincode),
                types_of_professions = COALESCE($9, types_of_professions)
            WHERE id = $1
            "#,
        )
        .bind(worker_id)
        .bind(changes.name.as_deref())
        .bind(changes.dob)
        .bind(changes.phone_no.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.city.as_deref())
        .bind(changes.pincode.as_deref())
        .bind(changes.professions.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
