pub mod admindb;
pub mod bookingdb;
pub mod feedbackdb;
pub mod otpdb;
pub mod userdb;
pub mod workerdb;

use sqlx::{Pool, Postgres};

use self::{
    admindb::AdminExt, bookingdb::BookingExt, feedbackdb::FeedbackExt, otpdb::OtpExt,
    userdb::UserExt, workerdb::WorkerExt,
};

#[derive(Debug, Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}

/// Everything the services need from persistent storage.
pub trait Store: UserExt + WorkerExt + AdminExt + OtpExt + BookingExt + FeedbackExt {}

impl<T> Store for T where T: UserExt + WorkerExt + AdminExt + OtpExt + BookingExt + FeedbackExt {}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
