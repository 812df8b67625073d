// test_support.rs
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDate, Utc};
use lettre::message::Mailbox;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{
        admindb::AdminExt, bookingdb::BookingExt, feedbackdb::FeedbackExt, otpdb::OtpExt,
        userdb::UserExt,
        workerdb::{RejectOutcome, WorkerExt},
    },
    mail::sendmail::{MailError, Mailer},
    models::{
        bookingmodel::{
            Bill, BillStatus, Booking, BookingDetails, BookingOwner, BookingStatus, USER_BOOKED,
            USER_PAID_AMOUNT, WORKER_ACCEPTED,
        },
        feedbackmodel::Feedback,
        otpmodel::OtpRecord,
        usermodel::{Administrator, NewAccount, ProfileChanges, User, UserType},
        workermodel::{VerificationState, WorkerApplication, WorkerSummary},
    },
    service::identity_service::{AuthSettings, IdentityService},
    utils::password,
};

/// Operation that should fail the next time the store reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    WorkerInsert,
    RejectionDelete,
    BillInsert,
    BillPayment,
    UserLookup,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    workers: Vec<WorkerApplication>,
    rejected: Vec<String>,
    admins: Vec<Administrator>,
    otps: HashMap<String, OtpRecord>,
    bookings: Vec<Booking>,
    bills: HashMap<Uuid, Bill>,
    feedback: Vec<Feedback>,
    failures: Vec<Failure>,
}

impl State {
    fn take_failure(&mut self, failure: Failure) -> Result<(), sqlx::Error> {
        match self.failures.iter().position(|f| *f == failure) {
            Some(index) => {
                self.failures.remove(index);
                Err(sqlx::Error::Protocol(format!("injected failure: {:?}", failure)))
            }
            None => Ok(()),
        }
    }

    fn verified_worker(&self, worker_id: Uuid) -> Option<&WorkerApplication> {
        self.workers
            .iter()
            .find(|w| w.id == worker_id && w.is_verified())
    }
}

/// Store double with the same guarded-update semantics as the Postgres client.
/// Every injected failure leaves the state exactly as it was.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn fail(&self, failure: Failure) {
        self.state().failures.push(failure);
    }

    pub fn insert_user(&self, user: User) -> User {
        self.state().users.push(user.clone());
        user
    }

    pub fn insert_worker(&self, worker: WorkerApplication) -> WorkerApplication {
        self.state().workers.push(worker.clone());
        worker
    }

    pub fn insert_rejected(&self, email: &str) {
        self.state().rejected.push(email.to_string());
    }

    pub fn otp(&self, email: &str) -> Option<OtpRecord> {
        self.state().otps.get(email).cloned()
    }

    pub fn age_otp(&self, email: &str, by: Duration) {
        if let Some(record) = self.state().otps.get_mut(email) {
            record.created_at = record.created_at - by;
        }
    }

    pub fn bill(&self, booking_id: Uuid) -> Option<Bill> {
        self.state().bills.get(&booking_id).cloned()
    }
}

fn apply_address(changes: &ProfileChanges, address: &mut String, city: &mut String, pincode: &mut String) {
    if let Some(value) = &changes.address {
        *address = value.clone();
    }
    if let Some(value) = &changes.city {
        *city = value.clone();
    }
    if let Some(value) = &changes.pincode {
        *pincode = value.clone();
    }
}

#[async_trait]
impl UserExt for InMemoryStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let mut state = self.state();
        state.take_failure(Failure::UserLookup)?;
        Ok(state.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error> {
        Ok(self.state().users.clone())
    }

    async fn save_user(&self, account: NewAccount) -> Result<User, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4(),
            name: account.name,
            dob: account.dob,
            email: account.email,
            phone_no: account.phone_no,
            password: account.password_hash,
            address: account.address,
            city: account.city,
            pincode: account.pincode,
            created_at: Utc::now(),
        };
        self.state().users.push(user.clone());
        Ok(user)
    }

    async fn update_user_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<u64, sqlx::Error> {
        let mut state = self.state();
        match state.users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password = password_hash;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<u64, sqlx::Error> {
        let mut state = self.state();
        let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(0);
        };

        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(dob) = changes.dob {
            user.dob = dob;
        }
        if let Some(phone_no) = &changes.phone_no {
            user.phone_no = phone_no.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password = hash.clone();
        }
        apply_address(changes, &mut user.address, &mut user.city, &mut user.pincode);
        Ok(1)
    }
}

#[async_trait]
impl WorkerExt for InMemoryStore {
    async fn save_worker_application(
        &self,
        account: NewAccount,
        professions: String,
        file_name: String,
        file_path: String,
    ) -> Result<WorkerApplication, sqlx::Error> {
        let mut state = self.state();
        state.take_failure(Failure::WorkerInsert)?;

        let worker = WorkerApplication {
            id: Uuid::new_v4(),
            name: account.name,
            dob: account.dob,
            email: account.email,
            password: account.password_hash,
            phone_no: account.phone_no,
            address: account.address,
            city: account.city,
            pincode: account.pincode,
            types_of_professions: professions,
            file_name,
            file_path,
            is_verified: VerificationState::Pending,
            created_at: Utc::now(),
        };
        state.workers.push(worker.clone());
        Ok(worker)
    }

    async fn get_worker(&self, worker_id: Uuid) -> Result<Option<WorkerApplication>, sqlx::Error> {
        Ok(self.state().workers.iter().find(|w| w.id == worker_id).cloned())
    }

    async fn get_verified_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Option<WorkerApplication>, sqlx::Error> {
        Ok(self.state().verified_worker(worker_id).cloned())
    }

    async fn get_worker_by_email(
        &self,
        email: &str,
    ) -> Result<Option<WorkerApplication>, sqlx::Error> {
        Ok(self.state().workers.iter().find(|w| w.email == email).cloned())
    }

    async fn get_worker_applications(&self) -> Result<Vec<WorkerApplication>, sqlx::Error> {
        Ok(self.state().workers.clone())
    }

    async fn search_verified_workers(
        &self,
        profession: &str,
    ) -> Result<Vec<WorkerSummary>, sqlx::Error> {
        let needle = profession.to_lowercase();
        Ok(self
            .state()
            .workers
            .iter()
            .filter(|w| w.is_verified())
            .filter(|w| {
                w.types_of_professions
                    .split(',')
                    .any(|tag| tag.trim().to_lowercase().contains(&needle))
            })
            .map(|w| WorkerSummary {
                id: w.id,
                name: w.name.clone(),
                email: w.email.clone(),
                phone_no: w.phone_no.clone(),
                city: w.city.clone(),
                types_of_professions: w.types_of_professions.clone(),
            })
            .collect())
    }

    async fn verify_worker(&self, worker_id: Uuid) -> Result<u64, sqlx::Error> {
        let mut state = self.state();
        match state.workers.iter_mut().find(|w| w.id == worker_id) {
            Some(worker) => {
                worker.is_verified = VerificationState::Verified;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn reject_worker(&self, worker_id: Uuid) -> Result<RejectOutcome, sqlx::Error> {
        let mut state = self.state();
        let Some(index) = state.workers.iter().position(|w| w.id == worker_id) else {
            return Ok(RejectOutcome::NotFound);
        };
        if state.bookings.iter().any(|b| b.worker_id == worker_id) {
            return Ok(RejectOutcome::HasBookings);
        }
        state.take_failure(Failure::RejectionDelete)?;

        let worker = state.workers.remove(index);
        state.rejected.push(worker.email.clone());
        Ok(RejectOutcome::Rejected(worker.email))
    }

    async fn is_rejected_worker(&self, email: &str) -> Result<bool, sqlx::Error> {
        Ok(self.state().rejected.iter().any(|e| e == email))
    }

    async fn update_worker_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<u64, sqlx::Error> {
        let mut state = self.state();
        match state.workers.iter_mut().find(|w| w.email == email) {
            Some(worker) => {
                worker.password = password_hash;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_worker_profile(
        &self,
        worker_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<u64, sqlx::Error> {
        let mut state = self.state();
        let Some(worker) = state.workers.iter_mut().find(|w| w.id == worker_id) else {
            return Ok(0);
        };

        if let Some(name) = &changes.name {
            worker.name = name.clone();
        }
        if let Some(dob) = changes.dob {
            worker.dob = dob;
        }
        if let Some(phone_no) = &changes.phone_no {
            worker.phone_no = phone_no.clone();
        }
        if let Some(hash) = &changes.password_hash {
            worker.password = hash.clone();
        }
        if let Some(professions) = &changes.professions {
            worker.types_of_professions = professions.clone();
        }
        apply_address(changes, &mut worker.address, &mut worker.city, &mut worker.pincode);
        Ok(1)
    }
}

#[async_trait]
impl AdminExt for InMemoryStore {
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Administrator>, sqlx::Error> {
        Ok(self.state().admins.iter().find(|a| a.email == email).cloned())
    }

    async fn upsert_admin(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<Administrator, sqlx::Error> {
        let mut state = self.state();
        if let Some(admin) = state.admins.iter_mut().find(|a| a.email == email) {
            admin.password = password_hash;
            return Ok(admin.clone());
        }

        let admin = Administrator {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: password_hash,
            created_at: Utc::now(),
        };
        state.admins.push(admin.clone());
        Ok(admin)
    }
}

#[async_trait]
impl OtpExt for InMemoryStore {
    async fn upsert_otp(&self, email: &str, otp: i32) -> Result<OtpRecord, sqlx::Error> {
        let record = OtpRecord {
            email: email.to_string(),
            otp,
            created_at: Utc::now(),
        };
        self.state().otps.insert(email.to_string(), record.clone());
        Ok(record)
    }

    async fn get_otp(&self, email: &str) -> Result<Option<OtpRecord>, sqlx::Error> {
        Ok(self.otp(email))
    }

    async fn delete_otp(&self, email: &str) -> Result<u64, sqlx::Error> {
        Ok(self.state().otps.remove(email).map_or(0, |_| 1))
    }
}

#[async_trait]
impl BookingExt for InMemoryStore {
    async fn get_open_booking(
        &self,
        user_id: Uuid,
        worker_id: Uuid,
        work_type: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        Ok(self
            .state()
            .bookings
            .iter()
            .find(|b| {
                b.user_id == user_id
                    && b.worker_id == worker_id
                    && b.work_type == work_type
                    && b.status.is_open()
            })
            .cloned())
    }

    async fn create_booking(
        &self,
        user_id: Uuid,
        worker_id: Uuid,
        work_type: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let mut state = self.state();
        let taken = state.bookings.iter().any(|b| {
            b.user_id == user_id
                && b.worker_id == worker_id
                && b.work_type == work_type
                && b.status.is_open()
        });
        if taken {
            return Ok(None);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id,
            worker_id,
            status: BookingStatus::InProgress,
            work_type: work_type.to_string(),
            booked_at: Utc::now(),
            status_changed_by: USER_BOOKED.to_string(),
        };
        state.bookings.push(booking.clone());
        Ok(Some(booking))
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        Ok(self.state().bookings.iter().find(|b| b.id == booking_id).cloned())
    }

    async fn get_bookings(
        &self,
        owner: BookingOwner,
        booking_id: Option<Uuid>,
    ) -> Result<Vec<BookingDetails>, sqlx::Error> {
        let state = self.state();
        let mut details: Vec<BookingDetails> = state
            .bookings
            .iter()
            .filter(|b| b.is_owned_by(owner))
            .filter(|b| booking_id.map_or(true, |id| b.id == id))
            .filter_map(|b| {
                let user = state.users.iter().find(|u| u.id == b.user_id)?;
                let worker = state.verified_worker(b.worker_id)?;
                let bill = state.bills.get(&b.id);

                Some(BookingDetails {
                    booking_id: b.id,
                    booking_user_id: b.user_id,
                    booking_worker_id: b.worker_id,
                    status: b.status,
                    work_type: b.work_type.clone(),
                    booked_at: b.booked_at,
                    status_changed_by: b.status_changed_by.clone(),
                    user_name: user.name.clone(),
                    user_email: user.email.clone(),
                    user_phone_no: user.phone_no.clone(),
                    user_address: user.address.clone(),
                    user_city: user.city.clone(),
                    user_pincode: user.pincode.clone(),
                    worker_name: worker.name.clone(),
                    worker_email: worker.email.clone(),
                    worker_phone_no: worker.phone_no.clone(),
                    worker_professions: worker.types_of_professions.clone(),
                    worker_city: worker.city.clone(),
                    worker_address: worker.address.clone(),
                    worker_pincode: worker.pincode.clone(),
                    total_bill: bill.map(|bl| bl.total_bill.clone()),
                    bill_status: bill.map(|bl| bl.bill_status),
                })
            })
            .collect();

        details.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(details)
    }

    async fn generate_bill(
        &self,
        booking_id: Uuid,
        total_bill: BigDecimal,
    ) -> Result<Option<Bill>, sqlx::Error> {
        let mut state = self.state();
        let Some(index) = state
            .bookings
            .iter()
            .position(|b| b.id == booking_id && b.status == BookingStatus::InProgress)
        else {
            return Ok(None);
        };
        state.take_failure(Failure::BillInsert)?;

        let booking = &mut state.bookings[index];
        booking.status = BookingStatus::Active;
        booking.status_changed_by = WORKER_ACCEPTED.to_string();

        let bill = Bill {
            id: booking_id,
            total_bill,
            bill_status: BillStatus::NotPaid,
            created_at: Utc::now(),
        };
        state.bills.insert(booking_id, bill.clone());
        Ok(Some(bill))
    }

    async fn complete_booking(&self, booking_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut state = self.state();
        let Some(index) = state
            .bookings
            .iter()
            .position(|b| b.id == booking_id && b.status == BookingStatus::Active)
        else {
            return Ok(false);
        };
        let unpaid = state
            .bills
            .get(&booking_id)
            .map_or(false, |bill| bill.bill_status == BillStatus::NotPaid);
        if !unpaid {
            return Ok(false);
        }
        state.take_failure(Failure::BillPayment)?;

        let booking = &mut state.bookings[index];
        booking.status = BookingStatus::Completed;
        booking.status_changed_by = USER_PAID_AMOUNT.to_string();
        if let Some(bill) = state.bills.get_mut(&booking_id) {
            bill.bill_status = BillStatus::Paid;
        }
        Ok(true)
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        owner: BookingOwner,
        marker: &str,
    ) -> Result<u64, sqlx::Error> {
        let mut state = self.state();
        match state
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id && b.is_owned_by(owner) && b.status.is_open())
        {
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                booking.status_changed_by = marker.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl FeedbackExt for InMemoryStore {
    async fn save_feedback(
        &self,
        submitter_id: Uuid,
        user_type: UserType,
        rating: i32,
        comments: String,
    ) -> Result<Feedback, sqlx::Error> {
        let feedback = Feedback {
            feedback_id: Uuid::new_v4(),
            submitter_id,
            user_type,
            rating,
            comments,
            created_at: Utc::now(),
        };
        self.state().feedback.push(feedback.clone());
        Ok(feedback)
    }

    async fn get_feedback(&self) -> Result<Vec<Feedback>, sqlx::Error> {
        Ok(self.state().feedback.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        let mailer = RecordingMailer::default();
        mailer.set_failing(true);
        mailer
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            let err = "not-an-address".parse::<Mailbox>().unwrap_err();
            return Err(MailError::Address(err));
        }

        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub fn sample_user(email: &str, plain_password: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Asha".to_string(),
        dob: NaiveDate::from_ymd_opt(1994, 3, 12).unwrap(),
        email: email.to_string(),
        phone_no: "9876543210".to_string(),
        password: password::hash(plain_password).unwrap(),
        address: "12 Lake Road".to_string(),
        city: "Pune".to_string(),
        pincode: "411001".to_string(),
        created_at: Utc::now(),
    }
}

/// Worker with password `password123`.
pub fn sample_worker(email: &str, professions: &str, verified: bool) -> WorkerApplication {
    WorkerApplication {
        id: Uuid::new_v4(),
        name: "Ravi".to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        email: email.to_string(),
        password: password::hash("password123").unwrap(),
        phone_no: "9000000000".to_string(),
        address: "4 Hill Street".to_string(),
        city: "Pune".to_string(),
        pincode: "411002".to_string(),
        types_of_professions: professions.to_string(),
        file_name: "proof.pdf".to_string(),
        file_path: "worker_proofs/proof.pdf".to_string(),
        is_verified: if verified {
            VerificationState::Verified
        } else {
            VerificationState::Pending
        },
        created_at: Utc::now(),
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/fixit_test".to_string(),
        database_max_connections: 1,
        jwt_secret: "test-secret".to_string(),
        jwt_maxage: 60,
        port: 0,
        smtp_host: "localhost".to_string(),
        smtp_port: 2525,
        smtp_username: "mailer@fixit.test".to_string(),
        smtp_password: "unused".to_string(),
        mail_from: "mailer@fixit.test".to_string(),
        upload_dir: std::env::temp_dir()
            .join(format!("fixit-proofs-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        otp_ttl_minutes: 10,
        admin_email_domain: "@admin.fixit".to_string(),
        admin_email: None,
        admin_password: None,
        allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Each call gets its own upload directory so tests can inspect it in isolation.
pub fn identity_service(store: Arc<InMemoryStore>, mailer: Arc<RecordingMailer>) -> IdentityService {
    IdentityService::new(store, mailer, AuthSettings::from_config(&test_config()))
}
