// service/booking_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    db::Store,
    dtos::bookingdtos::{CreateBookingDto, GenerateBillDto},
    mail::{mails, sendmail::Mailer},
    models::{
        bookingmodel::{cancelled_by, Bill, Booking, BookingDetails, BookingOwner, BookingStatus},
        usermodel::{Principal, UserType},
    },
    service::{
        error::ServiceError,
        notification::{Committed, NotificationStatus},
    },
};

const DUPLICATE_BOOKING: &str =
    "You already have booking with this worker for the selected work type.";

/// Email addresses of both parties of a booking, when they still exist.
struct Parties {
    user_email: Option<String>,
    worker_email: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum PartyNotice {
    Completed,
    Cancelled,
}

impl PartyNotice {
    fn context(&self) -> &'static str {
        match self {
            PartyNotice::Completed => "booking completion",
            PartyNotice::Cancelled => "booking cancellation",
        }
    }
}

/// Integer digits of the NUMERIC(12, 2) money column.
const MAX_BILL_DIGITS: u32 = 10;

fn validate_total_bill(total_bill: &BigDecimal) -> Result<(), ServiceError> {
    if *total_bill <= BigDecimal::from(0) {
        return Err(ServiceError::Validation(
            "Total bill must be greater than zero".to_string(),
        ));
    }

    if total_bill.with_scale(2) != *total_bill {
        return Err(ServiceError::Validation(
            "Total bill cannot have more than two decimal places".to_string(),
        ));
    }

    if *total_bill >= BigDecimal::from(10_i64.pow(MAX_BILL_DIGITS)) {
        return Err(ServiceError::Validation(
            "Total bill is too large".to_string(),
        ));
    }

    Ok(())
}

#[derive(Clone)]
pub struct BookingService {
    db_client: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
}

impl BookingService {
    pub fn new(db_client: Arc<dyn Store>, mailer: Arc<dyn Mailer>) -> Self {
        Self { db_client, mailer }
    }

    pub async fn create_booking(
        &self,
        principal: Principal,
        body: CreateBookingDto,
    ) -> Result<Committed<Booking>, ServiceError> {
        if principal.user_type != UserType::User {
            return Err(ServiceError::Unauthorized(
                "Only customers can book a worker".to_string(),
            ));
        }

        let work_type = body.work_type.trim();

        if self
            .db_client
            .get_open_booking(principal.id, body.worker_id, work_type)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(DUPLICATE_BOOKING.to_string()));
        }

        let worker = self
            .db_client
            .get_verified_worker(body.worker_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Worker not found".to_string()))?;

        let user = self
            .db_client
            .get_user(principal.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        // The partial unique index catches the race the pre-check cannot
        let booking = self
            .db_client
            .create_booking(user.id, worker.id, work_type)
            .await?
            .ok_or_else(|| ServiceError::Conflict(DUPLICATE_BOOKING.to_string()))?;

        tracing::info!(
            "Booking {} created by user {} for worker {}",
            booking.id,
            user.id,
            worker.id
        );

        let to_user = NotificationStatus::from_result(
            mails::send_booking_confirmation_email(self.mailer.as_ref(), &user.email, work_type)
                .await,
            "booking confirmation",
        );
        let to_worker = NotificationStatus::from_result(
            mails::send_new_booking_email(self.mailer.as_ref(), &worker.email, work_type).await,
            "new booking",
        );

        Ok(Committed::new(booking, to_user.combine(to_worker)))
    }

    pub async fn get_bookings(
        &self,
        principal: Principal,
        booking_id: Option<Uuid>,
    ) -> Result<Vec<BookingDetails>, ServiceError> {
        let owner = match principal.user_type {
            UserType::User => BookingOwner::User(principal.id),
            UserType::Worker => BookingOwner::Worker(principal.id),
            UserType::Admin => {
                return Err(ServiceError::Validation(
                    "User type not recognized".to_string(),
                ))
            }
        };

        Ok(self.db_client.get_bookings(owner, booking_id).await?)
    }

    /// IN_PROGRESS -> ACTIVE together with an unpaid bill.
    pub async fn generate_bill(
        &self,
        principal: Principal,
        body: GenerateBillDto,
    ) -> Result<Committed<Bill>, ServiceError> {
        if principal.user_type == UserType::User {
            return Err(ServiceError::Unauthorized("You are not authorized".to_string()));
        }

        validate_total_bill(&body.total_bill)?;

        let booking = self.find_booking(body.booking_id).await?;

        if principal.user_type == UserType::Worker
            && !booking.is_owned_by(BookingOwner::Worker(principal.id))
        {
            return Err(ServiceError::Unauthorized("You are not authorized".to_string()));
        }

        if !booking.status.can_transition_to(BookingStatus::Active) {
            return Err(ServiceError::Conflict(format!(
                "Booking is {} and cannot be billed",
                booking.status
            )));
        }

        let bill = self
            .db_client
            .generate_bill(booking.id, body.total_bill)
            .await?
            .ok_or_else(|| {
                ServiceError::Conflict("Booking is no longer in progress".to_string())
            })?;

        tracing::info!("Bill of {} generated for booking {}", bill.total_bill, booking.id);

        let notification = match self.db_client.get_user(booking.user_id).await {
            Ok(Some(user)) => NotificationStatus::from_result(
                mails::send_bill_generated_email(self.mailer.as_ref(), &user.email, &bill.total_bill)
                    .await,
                "bill generation",
            ),
            Ok(None) => NotificationStatus::Skipped,
            Err(err) => {
                tracing::warn!("Could not look up the customer of booking {}: {}", booking.id, err);
                NotificationStatus::Failed
            }
        };

        Ok(Committed::new(bill, notification))
    }

    /// ACTIVE -> COMPLETED and the bill NOT_PAID -> PAID, as one unit.
    pub async fn complete_booking(
        &self,
        principal: Principal,
        booking_id: Uuid,
    ) -> Result<Committed<()>, ServiceError> {
        if principal.user_type == UserType::Worker {
            return Err(ServiceError::Unauthorized(
                "You are not authorized to complete the booking".to_string(),
            ));
        }

        let booking = self.find_booking(booking_id).await?;

        if principal.user_type == UserType::User
            && !booking.is_owned_by(BookingOwner::User(principal.id))
        {
            return Err(ServiceError::Unauthorized(
                "You are not authorized to complete the booking".to_string(),
            ));
        }

        if !booking.status.can_transition_to(BookingStatus::Completed) {
            return Err(ServiceError::Conflict(format!(
                "Booking is {} and cannot be completed",
                booking.status
            )));
        }

        if !self.db_client.complete_booking(booking.id).await? {
            return Err(ServiceError::Conflict(
                "Booking has no unpaid bill to settle".to_string(),
            ));
        }

        tracing::info!("Booking {} completed", booking.id);

        let notification = match self.parties(&booking).await {
            Some(parties) => self.notify_parties(&parties, PartyNotice::Completed).await,
            None => NotificationStatus::Failed,
        };

        Ok(Committed::new((), notification))
    }

    /// Cancels an open booking owned by the caller.
    pub async fn cancel_booking(
        &self,
        principal: Principal,
        booking_id: Uuid,
    ) -> Result<Committed<()>, ServiceError> {
        let owner = match principal.user_type {
            UserType::User => BookingOwner::User(principal.id),
            UserType::Worker => BookingOwner::Worker(principal.id),
            UserType::Admin => {
                return Err(ServiceError::Unauthorized("You are not authorized".to_string()))
            }
        };

        let booking = self.find_booking(booking_id).await?;
        if !booking.is_owned_by(owner) {
            return Err(ServiceError::NotFound("Booking not found".to_string()));
        }

        if booking.status.is_terminal() {
            return Err(ServiceError::Conflict(format!(
                "Booking is already {}",
                booking.status
            )));
        }

        let marker = cancelled_by(owner.user_type());
        if self
            .db_client
            .cancel_booking(booking.id, owner, &marker)
            .await?
            == 0
        {
            return Err(ServiceError::Conflict(
                "Booking can no longer be cancelled".to_string(),
            ));
        }

        tracing::info!("Booking {} cancelled ({})", booking.id, marker);

        let notification = match self.parties(&booking).await {
            Some(parties) => self.notify_parties(&parties, PartyNotice::Cancelled).await,
            None => NotificationStatus::Failed,
        };

        Ok(Committed::new((), notification))
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        self.db_client
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Booking not found".to_string()))
    }

    /// Runs after the commit, so a failed read only costs the emails.
    async fn parties(&self, booking: &Booking) -> Option<Parties> {
        let lookup = async {
            let user_email = self
                .db_client
                .get_user(booking.user_id)
                .await?
                .map(|user| user.email);
            let worker_email = self
                .db_client
                .get_worker(booking.worker_id)
                .await?
                .map(|worker| worker.email);

            Ok::<_, sqlx::Error>(Parties {
                user_email,
                worker_email,
            })
        };

        match lookup.await {
            Ok(parties) => Some(parties),
            Err(err) => {
                tracing::warn!("Could not look up the parties of booking {}: {}", booking.id, err);
                None
            }
        }
    }

    async fn notify_parties(&self, parties: &Parties, notice: PartyNotice) -> NotificationStatus {
        let mut status = NotificationStatus::Skipped;

        for (email, recipient) in [
            (parties.user_email.as_deref(), UserType::User),
            (parties.worker_email.as_deref(), UserType::Worker),
        ] {
            if let Some(email) = email {
                let sent = match notice {
                    PartyNotice::Completed => {
                        mails::send_booking_completed_email(self.mailer.as_ref(), email, recipient)
                            .await
                    }
                    PartyNotice::Cancelled => {
                        mails::send_booking_cancelled_email(self.mailer.as_ref(), email, recipient)
                            .await
                    }
                };
                status = status.combine(NotificationStatus::from_result(sent, notice.context()));
            }
        }

        status
    }
}
