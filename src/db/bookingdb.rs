// db/bookingdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::{is_unique_violation, DBClient};
use crate::models::bookingmodel::{
    Bill, Booking, BookingDetails, BookingOwner, USER_BOOKED, USER_PAID_AMOUNT, WORKER_ACCEPTED,
};

const BOOKING_COLUMNS: &str = "id, user_id, worker_id, status, work_type, booked_at, status_changed_by";

const BOOKING_DETAILS_SELECT: &str = r#"
    SELECT
        b.id AS booking_id,
        b.user_id AS booking_user_id,
        b.worker_id AS booking_worker_id,
        b.status,
        b.work_type,
        b.booked_at,
        b.status_changed_by,
        u.name AS user_name,
        u.email AS user_email,
        u.phone_no AS user_phone_no,
        u.address AS user_address,
        u.city AS user_city,
        u.pincode AS user_pincode,
        w.name AS worker_name,
        w.email AS worker_email,
        w.phone_no AS worker_phone_no,
        w.types_of_professions AS worker_professions,
        w.city AS worker_city,
        w.address AS worker_address,
        w.pincode AS worker_pincode,
        bl.total_bill,
        bl.bill_status
    FROM bookings b
    JOIN users u ON u.id = b.user_id
    JOIN worker_applications w ON w.id = b.worker_id AND w.is_verified = 'true'
    LEFT JOIN bills bl ON bl.id = b.id
"#;

#[async_trait]
pub trait BookingExt: Send + Sync {
    /// The IN_PROGRESS or ACTIVE booking for this triple, if any.
    async fn get_open_booking(
        &self,
        user_id: Uuid,
        worker_id: Uuid,
        work_type: &str,
    ) -> Result<Option<Booking>, sqlx::Error>;

    /// `None` when a concurrent request already holds the open slot.
    async fn create_booking(
        &self,
        user_id: Uuid,
        worker_id: Uuid,
        work_type: &str,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;

    async fn get_bookings(
        &self,
        owner: BookingOwner,
        booking_id: Option<Uuid>,
    ) -> Result<Vec<BookingDetails>, sqlx::Error>;

    /// Moves IN_PROGRESS to ACTIVE and inserts the unpaid bill as one unit.
    /// `None` when the booking was no longer IN_PROGRESS.
    async fn generate_bill(
        &self,
        booking_id: Uuid,
        total_bill: BigDecimal,
    ) -> Result<Option<Bill>, sqlx::Error>;

    /// Moves ACTIVE to COMPLETED and marks the bill PAID as one unit.
    /// `false` when either half did not apply; nothing is written then.
    async fn complete_booking(&self, booking_id: Uuid) -> Result<bool, sqlx::Error>;

    /// Cancels the booking if it is still open and owned by `owner`.
    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        owner: BookingOwner,
        marker: &str,
    ) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn get_open_booking(
        &self,
        user_id: Uuid,
        worker_id: Uuid,
        work_type: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {} FROM bookings
            WHERE user_id = $1 AND worker_id = $2 AND work_type = $3
              AND status IN ('IN_PROGRESS', 'ACTIVE')
            "#,
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .bind(worker_id)
        .bind(work_type)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_booking(
        &self,
        user_id: Uuid,
        worker_id: Uuid,
        work_type: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let inserted = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (id, user_id, worker_id, status, work_type, status_changed_by)
            VALUES ($1, $2, $3, 'IN_PROGRESS', $4, $5)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(worker_id)
        .bind(work_type)
        .bind(USER_BOOKED)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(booking) => Ok(Some(booking)),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bookings(
        &self,
        owner: BookingOwner,
        booking_id: Option<Uuid>,
    ) -> Result<Vec<BookingDetails>, sqlx::Error> {
        let owner_column = match owner {
            BookingOwner::User(_) => "b.user_id",
            BookingOwner::Worker(_) => "b.worker_id",
        };

        sqlx::query_as::<_, BookingDetails>(&format!(
            "{} WHERE {} = $1 AND ($2::uuid IS NULL OR b.id = $2) ORDER BY b.booked_at DESC",
            BOOKING_DETAILS_SELECT, owner_column
        ))
        .bind(owner.id())
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn generate_bill(
        &self,
        booking_id: Uuid,
        total_bill: BigDecimal,
    ) -> Result<Option<Bill>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let moved = sqlx::query(
            r#"
            UPDATE bookings SET status = 'ACTIVE', status_changed_by = $2
            WHERE id = $1 AND status = 'IN_PROGRESS'
            "#,
        )
        .bind(booking_id)
        .bind(WORKER_ACCEPTED)
        .execute(&mut *tx)
        .await?;

        if moved.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let bill = sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO bills (id, total_bill, bill_status)
            VALUES ($1, $2, 'NOT_PAID')
            RETURNING id, total_bill, bill_status, created_at
            "#,
        )
        .bind(booking_id)
        .bind(total_bill)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(bill))
    }

    async fn complete_booking(&self, booking_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let completed = sqlx::query(
            r#"
            UPDATE bookings SET status = 'COMPLETED', status_changed_by = $2
            WHERE id = $1 AND status = 'ACTIVE'
            "#,
        )
        .bind(booking_id)
        .bind(USER_PAID_AMOUNT)
        .execute(&mut *tx)
        .await?;

        if completed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let paid = sqlx::query(
            "UPDATE bills SET bill_status = 'PAID' WHERE id = $1 AND bill_status = 'NOT_PAID'",
        )
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        if paid.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        Ok(true)
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        owner: BookingOwner,
        marker: &str,
    ) -> Result<u64, sqlx::Error> {
        let owner_column = match owner {
            BookingOwner::User(_) => "user_id",
            BookingOwner::Worker(_) => "worker_id",
        };

        let result = sqlx::query(&format!(
            r#"
            UPDATE bookings SET status = 'CANCELLED', status_changed_by = $3
            WHERE id = $1 AND {} = $2 AND status IN ('IN_PROGRESS', 'ACTIVE')
            "#,
            owner_column
        ))
        .bind(booking_id)
        .bind(owner.id())
        .bind(marker)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
