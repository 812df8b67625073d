// service/identity_service.rs
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    config::Config,
    db::{is_unique_violation, Store},
    dtos::{
        userdtos::{ForgotPasswordDto, LoginUserDto, ResetPasswordDto, SignupUserDto},
        workerdtos::WorkerApplicationDto,
    },
    error::ErrorMessage,
    mail::{mails, sendmail::Mailer},
    models::{
        otpmodel::OtpPurpose,
        usermodel::{NewAccount, User, UserType},
        workermodel::{join_professions, split_professions, WorkerApplication},
    },
    service::{
        error::ServiceError,
        notification::{Committed, NotificationStatus},
    },
    utils::{
        otp_generator::generate_otp,
        password, token,
        upload::{self, ProofUpload},
    },
};

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub otp_ttl_minutes: i64,
    pub admin_email_domain: String,
    pub upload_dir: String,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        AuthSettings {
            jwt_secret: config.jwt_secret.clone(),
            jwt_maxage: config.jwt_maxage,
            otp_ttl_minutes: config.otp_ttl_minutes,
            admin_email_domain: config.admin_email_domain.clone(),
            upload_dir: config.upload_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated { token: String, user_type: UserType },
    /// Worker whose application has not been verified yet. No token is issued.
    PendingVerification,
}

#[derive(Clone)]
pub struct IdentityService {
    db_client: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    settings: AuthSettings,
}

impl IdentityService {
    pub fn new(db_client: Arc<dyn Store>, mailer: Arc<dyn Mailer>, settings: AuthSettings) -> Self {
        Self {
            db_client,
            mailer,
            settings,
        }
    }

    /// Sends a fresh code and only then stores it, replacing any earlier one.
    pub async fn request_otp(&self, email: &str) -> Result<(), ServiceError> {
        self.issue_otp(email, OtpPurpose::AccountVerification).await
    }

    pub async fn verify_otp(&self, email: &str, submitted: Option<i32>) -> Result<(), ServiceError> {
        self.check_otp(email, submitted).await?;
        self.db_client.delete_otp(email).await?;

        tracing::info!("OTP verified for {}", email);
        Ok(())
    }

    pub async fn signup(&self, body: SignupUserDto) -> Result<User, ServiceError> {
        if self.db_client.get_user_by_email(&body.email).await?.is_some() {
            return Err(ErrorMessage::EmailExist.into());
        }

        let password_hash = password::hash(&body.password)?;
        let account = NewAccount {
            name: body.name,
            dob: body.dob,
            email: body.email,
            phone_no: body.phone_no,
            password_hash,
            address: body.address,
            city: body.city,
            pincode: body.pincode,
        };

        let user = self.db_client.save_user(account).await.map_err(|e| {
            if is_unique_violation(&e) {
                ErrorMessage::EmailExist.into()
            } else {
                ServiceError::Database(e)
            }
        })?;

        tracing::info!("User {} registered", user.id);
        Ok(user)
    }

    /// The application always starts as pending, whatever the caller sent.
    pub async fn apply_as_worker(
        &self,
        body: WorkerApplicationDto,
        proof: ProofUpload,
    ) -> Result<WorkerApplication, ServiceError> {
        upload::validate_proof(&proof)?;

        let professions = join_professions(&split_professions(&body.types_of_professions));
        if professions.is_empty() {
            return Err(ServiceError::Validation(
                "At least one profession is required".to_string(),
            ));
        }

        if self.db_client.get_worker_by_email(&body.email).await?.is_some() {
            return Err(ErrorMessage::EmailExist.into());
        }

        let password_hash = password::hash(&body.password)?;
        let stored = upload::store_proof(&self.settings.upload_dir, &proof).await?;

        let account = NewAccount {
            name: body.name,
            dob: body.dob,
            email: body.email,
            phone_no: body.phone_no,
            password_hash,
            address: body.address,
            city: body.city,
            pincode: body.pincode,
        };

        let saved = self
            .db_client
            .save_worker_application(
                account,
                professions,
                stored.file_name.clone(),
                stored.file_path.clone(),
            )
            .await;

        match saved {
            Ok(application) => {
                tracing::info!("Worker application {} submitted", application.id);
                Ok(application)
            }
            Err(e) => {
                upload::remove_proof(&stored).await;
                if is_unique_violation(&e) {
                    Err(ErrorMessage::EmailExist.into())
                } else {
                    Err(ServiceError::Database(e))
                }
            }
        }
    }

    pub async fn login(&self, body: LoginUserDto) -> Result<LoginOutcome, ServiceError> {
        if body.email.contains(&self.settings.admin_email_domain) {
            return self.login_admin(&body.email, &body.password).await;
        }

        match body.user_type {
            UserType::User => {
                let user = self
                    .db_client
                    .get_user_by_email(&body.email)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::Validation(
                            "User not found Please signup for a new account".to_string(),
                        )
                    })?;

                self.check_password(&body.password, &user.password)?;
                self.authenticated(user.id, UserType::User)
            }
            claimed => {
                let Some(worker) = self.db_client.get_worker_by_email(&body.email).await? else {
                    return Err(self.missing_worker(&body.email, claimed).await?);
                };

                self.check_password(&body.password, &worker.password)?;

                if !worker.is_verified() {
                    tracing::debug!("Login for pending worker {}", worker.id);
                    return Ok(LoginOutcome::PendingVerification);
                }

                self.authenticated(worker.id, UserType::Worker)
            }
        }
    }

    pub async fn forgot_password(&self, body: ForgotPasswordDto) -> Result<(), ServiceError> {
        let registered = match body.user_type {
            UserType::User => self.db_client.get_user_by_email(&body.email).await?.is_some(),
            _ => self.db_client.get_worker_by_email(&body.email).await?.is_some(),
        };

        if !registered {
            return Err(ServiceError::NotFound("Email not registered".to_string()));
        }

        self.issue_otp(&body.email, OtpPurpose::PasswordReset).await
    }

    /// The new hash is stored before the confirmation email goes out; a failed
    /// confirmation is reported, never rolled back.
    pub async fn reset_password(&self, body: ResetPasswordDto) -> Result<Committed<()>, ServiceError> {
        self.check_otp(&body.email, body.otp.value()).await?;

        let password_hash = password::hash(&body.new_password)?;
        let updated = match body.user_type {
            UserType::User => {
                self.db_client
                    .update_user_password(&body.email, password_hash)
                    .await?
            }
            _ => {
                self.db_client
                    .update_worker_password(&body.email, password_hash)
                    .await?
            }
        };

        if updated == 0 {
            return Err(ServiceError::NotFound("Email not registered".to_string()));
        }

        self.db_client.delete_otp(&body.email).await?;
        tracing::info!("Password reset for {}", body.email);

        let sent =
            mails::send_password_reset_success_email(self.mailer.as_ref(), &body.email).await;

        Ok(Committed::new(
            (),
            NotificationStatus::from_result(sent, "password reset"),
        ))
    }

    /// Creates or refreshes the bootstrap administrator.
    pub async fn ensure_admin(&self, email: &str, plain_password: &str) -> Result<(), ServiceError> {
        if !email.contains(&self.settings.admin_email_domain) {
            tracing::warn!(
                "Administrator {} does not match {}; it will not be able to log in",
                email,
                self.settings.admin_email_domain
            );
        }

        let password_hash = password::hash(plain_password)?;
        self.db_client.upsert_admin(email, password_hash).await?;

        tracing::info!("Administrator {} is ready", email);
        Ok(())
    }

    async fn issue_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), ServiceError> {
        let otp = generate_otp();

        mails::send_otp_email(
            self.mailer.as_ref(),
            email,
            otp,
            purpose,
            self.settings.otp_ttl_minutes,
        )
        .await?;

        self.db_client.upsert_otp(email, otp).await?;

        tracing::info!("OTP issued to {} for {:?}", email, purpose);
        Ok(())
    }

    /// Leaves the record in place on a wrong code so the caller can retry.
    async fn check_otp(&self, email: &str, submitted: Option<i32>) -> Result<(), ServiceError> {
        let record = self
            .db_client
            .get_otp(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Email not found".to_string()))?;

        let ttl = Duration::minutes(self.settings.otp_ttl_minutes);
        if record.is_expired(ttl, Utc::now()) {
            self.db_client.delete_otp(email).await?;
            return Err(ServiceError::Validation("OTP has expired".to_string()));
        }

        match submitted {
            Some(code) if code == record.otp => Ok(()),
            _ => Err(ServiceError::Validation("Invalid OTP".to_string())),
        }
    }

    async fn login_admin(&self, email: &str, plain_password: &str) -> Result<LoginOutcome, ServiceError> {
        let admin = self
            .db_client
            .get_admin_by_email(email)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation("User not found Please signup for a new account".to_string())
            })?;

        self.check_password(plain_password, &admin.password)?;
        self.authenticated(admin.id, UserType::Admin)
    }

    async fn missing_worker(&self, email: &str, claimed: UserType) -> Result<ServiceError, ServiceError> {
        if claimed != UserType::Worker {
            return Ok(ServiceError::Validation(
                "User not found Please signup for a new account".to_string(),
            ));
        }

        if self.db_client.is_rejected_worker(email).await? {
            return Ok(ServiceError::Forbidden(
                "Your application was rejected. Please provide valid credentials.".to_string(),
            ));
        }

        Ok(ServiceError::Validation(
            "Worker not found. Please sign up for a new account.".to_string(),
        ))
    }

    fn check_password(&self, plain: &str, hashed: &str) -> Result<(), ServiceError> {
        if password::compare(plain, hashed)? {
            Ok(())
        } else {
            Err(ErrorMessage::WrongCredentials.into())
        }
    }

    fn authenticated(&self, id: uuid::Uuid, user_type: UserType) -> Result<LoginOutcome, ServiceError> {
        let token = token::create_token(
            id,
            user_type,
            self.settings.jwt_secret.as_bytes(),
            self.settings.jwt_maxage,
        )
        .map_err(|e| ServiceError::Other(e.to_string()))?;

        tracing::info!("{} {} logged in", user_type, id);
        Ok(LoginOutcome::Authenticated { token, user_type })
    }
}
