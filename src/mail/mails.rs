use bigdecimal::BigDecimal;

use super::sendmail::{MailError, Mailer};
use crate::models::{otpmodel::OtpPurpose, usermodel::UserType};

const OTP_VERIFICATION: &str = include_str!("templates/otp_verification.txt");
const PASSWORD_RESET_OTP: &str = include_str!("templates/password_reset_otp.txt");
const PASSWORD_RESET_SUCCESS: &str = include_str!("templates/password_reset_success.txt");
const WORKER_VERIFIED: &str = include_str!("templates/worker_verified.txt");
const WORKER_REJECTED: &str = include_str!("templates/worker_rejected.txt");
const BOOKING_CONFIRMED_USER: &str = include_str!("templates/booking_confirmed_user.txt");
const BOOKING_NEW_WORKER: &str = include_str!("templates/booking_new_worker.txt");
const BILL_GENERATED: &str = include_str!("templates/bill_generated.txt");
const BOOKING_CANCELLED_USER: &str = include_str!("templates/booking_cancelled_user.txt");
const BOOKING_CANCELLED_WORKER: &str = include_str!("templates/booking_cancelled_worker.txt");
const BOOKING_COMPLETED_USER: &str = include_str!("templates/booking_completed_user.txt");
const BOOKING_COMPLETED_WORKER: &str = include_str!("templates/booking_completed_worker.txt");

/// Substitutes every `{{key}}` in the template.
fn render(template: &str, placeholders: &[(&str, String)]) -> String {
    let mut body = template.to_string();
    for (key, value) in placeholders {
        body = body.replace(&format!("{{{{{}}}}}", key), value);
    }
    body
}

pub async fn send_otp_email(
    mailer: &dyn Mailer,
    to_email: &str,
    otp: i32,
    purpose: OtpPurpose,
    ttl_minutes: i64,
) -> Result<(), MailError> {
    let (subject, template) = match purpose {
        OtpPurpose::AccountVerification => ("OTP for Fixit Account Verification", OTP_VERIFICATION),
        OtpPurpose::PasswordReset => ("FixIt Password Reset OTP", PASSWORD_RESET_OTP),
    };
    let body = render(
        template,
        &[("otp", otp.to_string()), ("ttl_minutes", ttl_minutes.to_string())],
    );

    mailer.send_mail(to_email, subject, &body).await
}

pub async fn send_password_reset_success_email(
    mailer: &dyn Mailer,
    to_email: &str,
) -> Result<(), MailError> {
    mailer
        .send_mail(to_email, "FixIt Password Reset Successful", PASSWORD_RESET_SUCCESS)
        .await
}

pub async fn send_worker_verified_email(
    mailer: &dyn Mailer,
    to_email: &str,
) -> Result<(), MailError> {
    mailer
        .send_mail(to_email, "FixIt Account Verification", WORKER_VERIFIED)
        .await
}

pub async fn send_worker_rejected_email(
    mailer: &dyn Mailer,
    to_email: &str,
) -> Result<(), MailError> {
    mailer
        .send_mail(to_email, "FixIt Account Verification", WORKER_REJECTED)
        .await
}

pub async fn send_booking_confirmation_email(
    mailer: &dyn Mailer,
    to_email: &str,
    work_type: &str,
) -> Result<(), MailError> {
    let body = render(BOOKING_CONFIRMED_USER, &[("work_type", work_type.to_string())]);
    mailer
        .send_mail(to_email, "FixIt Booking Confirmation", &body)
        .await
}

pub async fn send_new_booking_email(
    mailer: &dyn Mailer,
    to_email: &str,
    work_type: &str,
) -> Result<(), MailError> {
    let body = render(BOOKING_NEW_WORKER, &[("work_type", work_type.to_string())]);
    mailer
        .send_mail(to_email, "FixIt New Booking Notification", &body)
        .await
}

pub async fn send_bill_generated_email(
    mailer: &dyn Mailer,
    to_email: &str,
    total_bill: &BigDecimal,
) -> Result<(), MailError> {
    let body = render(BILL_GENERATED, &[("total_bill", total_bill.to_string())]);
    mailer.send_mail(to_email, "FixIt Bill Generation", &body).await
}

pub async fn send_booking_cancelled_email(
    mailer: &dyn Mailer,
    to_email: &str,
    recipient: UserType,
) -> Result<(), MailError> {
    let body = match recipient {
        UserType::Worker => BOOKING_CANCELLED_WORKER,
        _ => BOOKING_CANCELLED_USER,
    };
    mailer
        .send_mail(to_email, "FixIt Booking Cancellation", body)
        .await
}

pub async fn send_booking_completed_email(
    mailer: &dyn Mailer,
    to_email: &str,
    recipient: UserType,
) -> Result<(), MailError> {
    let body = match recipient {
        UserType::Worker => BOOKING_COMPLETED_WORKER,
        _ => BOOKING_COMPLETED_USER,
    };
    mailer
        .send_mail(to_email, "FixIt Booking Completion", body)
        .await
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::test_support::RecordingMailer;

    #[test]
    fn render_replaces_every_placeholder() {
        let body = render(OTP_VERIFICATION, &[("otp", "4821".into()), ("ttl_minutes", "10".into())]);
        assert!(body.contains("---- 4821 ----"));
        assert!(body.contains("valid for 10 minutes"));
        assert!(!body.contains("{{"));
    }

    #[tokio::test]
    async fn otp_subject_depends_on_purpose() {
        let mailer = RecordingMailer::default();

        send_otp_email(&mailer, "a@fixit.test", 1234, OtpPurpose::AccountVerification, 10)
            .await
            .unwrap();
        send_otp_email(&mailer, "a@fixit.test", 5678, OtpPurpose::PasswordReset, 10)
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent[0].subject, "OTP for Fixit Account Verification");
        assert!(sent[0].body.contains("1234"));
        assert_eq!(sent[1].subject, "FixIt Password Reset OTP");
        assert!(sent[1].body.contains("5678"));
    }

    #[tokio::test]
    async fn bill_email_carries_the_amount() {
        let mailer = RecordingMailer::default();
        let total = BigDecimal::from_str("1500.50").unwrap();

        send_bill_generated_email(&mailer, "u@fixit.test", &total).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Total Bill: Rs.1500.50"));
    }

    #[tokio::test]
    async fn cancellation_wording_follows_the_recipient() {
        let mailer = RecordingMailer::default();

        send_booking_cancelled_email(&mailer, "u@fixit.test", UserType::User).await.unwrap();
        send_booking_cancelled_email(&mailer, "w@fixit.test", UserType::Worker).await.unwrap();

        let sent = mailer.sent();
        assert!(sent[0].body.starts_with("Dear User"));
        assert!(sent[1].body.starts_with("Dear Worker"));
    }
}
