//! SMTP delivery of rendered payslips.

use std::env;
use std::fs;
use std::path::Path;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::error::{ConfigError, NotifyError};
use crate::models::employee::EmployeeRecord;

pub const EMAIL_USER_ENV: &str = "EMAIL_USER";
pub const EMAIL_PASSWORD_ENV: &str = "EMAIL_PASSWORD";

/// Fixed submission endpoint; the credentials select the sending account.
const SMTP_RELAY: &str = "smtp.gmail.com";

const SUBJECT: &str = "Your Payslip for This Month";

/// SMTP account credentials, resolved once at startup and passed into the
/// mailer at construction.
#[derive(Clone)]
pub struct SmtpConfig {
    pub username: String,
    pub password: String,
}

impl SmtpConfig {
    /// Read credentials from the environment, rejecting absent or empty
    /// values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: required_var(EMAIL_USER_ENV)?,
            password: required_var(EMAIL_PASSWORD_ENV)?,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::MissingVar(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyVar(name));
    }
    Ok(value)
}

/// Delivery seam: the orchestrator only needs "send this payslip to its
/// owner". Tests substitute a stub.
pub trait Mailer {
    fn send_payslip(&self, record: &EmployeeRecord, attachment: &Path) -> Result<(), NotifyError>;
}

/// Production mailer: one authenticated STARTTLS session per send.
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

impl Mailer for SmtpMailer {
    fn send_payslip(&self, record: &EmployeeRecord, attachment: &Path) -> Result<(), NotifyError> {
        let email = payslip_message(&self.config.username, record, attachment)?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());
        // The transport lives only for this send; it is dropped on return
        // whether or not the submission succeeds.
        let mailer = SmtpTransport::starttls_relay(SMTP_RELAY)?
            .credentials(creds)
            .build();
        mailer.send(&email)?;

        info!("Email sent successfully to {}", record.email);
        Ok(())
    }
}

/// Compose the fixed-template message with the payslip attached. Only the
/// recipient's name is interpolated into the body.
fn payslip_message(
    from: &str,
    record: &EmployeeRecord,
    attachment: &Path,
) -> Result<Message, NotifyError> {
    let filename = attachment
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.pdf", record.employee_id));
    let content = fs::read(attachment)?;

    let body = format!(
        "Dear {},\n\nPlease find your payslip attached.\n\nRegards,\nHR Team",
        record.name
    );

    Ok(Message::builder()
        .from(from.parse::<Mailbox>()?)
        .to(record.email.parse::<Mailbox>()?)
        .subject(SUBJECT)
        .multipart(
            MultiPart::mixed()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(body),
                )
                .singlepart(
                    Attachment::new(filename)
                        .body(content, ContentType::parse("application/pdf")?),
                ),
        )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EmployeeRecord {
        EmployeeRecord::new(
            "E1".into(),
            "Ann Lee".into(),
            "ann@x.com".into(),
            3000.0,
            200.0,
            150.0,
        )
    }

    #[test]
    fn message_uses_the_fixed_subject_and_greets_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("E1.pdf");
        fs::write(&path, b"%PDF-1.5").unwrap();

        let message = payslip_message("hr@x.com", &record(), &path).unwrap();

        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("Subject: Your Payslip for This Month"));
        assert!(rendered.contains("To: ann@x.com"));
        assert!(rendered.contains("Dear Ann Lee,"));
        assert!(rendered.contains("filename=\"E1.pdf\""));
    }

    #[test]
    fn missing_attachment_is_a_notify_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pdf");

        let err = payslip_message("hr@x.com", &record(), &path).unwrap_err();
        assert!(matches!(err, NotifyError::Attachment(_)));
    }

    #[test]
    fn invalid_recipient_address_is_a_notify_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("E1.pdf");
        fs::write(&path, b"%PDF-1.5").unwrap();

        let mut bad = record();
        bad.email = "not-an-address".into();

        let err = payslip_message("hr@x.com", &bad, &path).unwrap_err();
        assert!(matches!(err, NotifyError::Address(_)));
    }

    #[test]
    fn missing_credential_var_is_rejected() {
        let err = required_var("PAYSLIP_UTIL_TEST_UNSET_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn empty_credential_var_is_rejected() {
        // Var name is unique to this test, so the global mutation is safe.
        unsafe { env::set_var("PAYSLIP_UTIL_TEST_EMPTY_VAR", " ") };
        let err = required_var("PAYSLIP_UTIL_TEST_EMPTY_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyVar(_)));
    }
}
