use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::usermodel::UserType;

pub const USER_BOOKED: &str = "USER BOOKED";
pub const WORKER_ACCEPTED: &str = "WORKER ACCEPTED";
pub const USER_PAID_AMOUNT: &str = "USER PAID AMOUNT";

/// Audit marker written when `by` cancels a booking.
pub fn cancelled_by(by: UserType) -> String {
    format!("{} CANCELLED", by)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    InProgress,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Active => "ACTIVE",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// At most one open booking may exist per (user, worker, work type).
    pub fn is_open(&self) -> bool {
        matches!(self, BookingStatus::InProgress | BookingStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::InProgress, BookingStatus::Active)
                | (BookingStatus::InProgress, BookingStatus::Cancelled)
                | (BookingStatus::Active, BookingStatus::Completed)
                | (BookingStatus::Active, BookingStatus::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "bill_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    NotPaid,
    Paid,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub worker_id: Uuid,
    pub status: BookingStatus,
    pub work_type: String,
    pub booked_at: DateTime<Utc>,
    pub status_changed_by: String,
}

impl Booking {
    pub fn is_owned_by(&self, owner: BookingOwner) -> bool {
        match owner {
            BookingOwner::User(id) => self.user_id == id,
            BookingOwner::Worker(id) => self.worker_id == id,
        }
    }
}

/// A bill shares its id with the booking it was generated for.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Bill {
    pub id: Uuid,
    pub total_bill: BigDecimal,
    pub bill_status: BillStatus,
    pub created_at: DateTime<Utc>,
}

/// The party a booking query or guarded update is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOwner {
    User(Uuid),
    Worker(Uuid),
}

impl BookingOwner {
    pub fn id(&self) -> Uuid {
        match self {
            BookingOwner::User(id) | BookingOwner::Worker(id) => *id,
        }
    }

    pub fn user_type(&self) -> UserType {
        match self {
            BookingOwner::User(_) => UserType::User,
            BookingOwner::Worker(_) => UserType::Worker,
        }
    }
}

/// Booking joined with both parties and its bill, as listed to either side.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct BookingDetails {
    pub booking_id: Uuid,
    pub booking_user_id: Uuid,
    pub booking_worker_id: Uuid,
    pub status: BookingStatus,
    pub work_type: String,
    pub booked_at: DateTime<Utc>,
    pub status_changed_by: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone_no: String,
    pub user_address: String,
    pub user_city: String,
    pub user_pincode: String,
    pub worker_name: String,
    pub worker_email: String,
    pub worker_phone_no: String,
    pub worker_professions: String,
    pub worker_city: String,
    pub worker_address: String,
    pub worker_pincode: String,
    pub total_bill: Option<BigDecimal>,
    pub bill_status: Option<BillStatus>,
}
