//! Payslip Utility Library
//!
//! This library provides functionality for loading employee compensation
//! records from a spreadsheet, generating PDF payslips, and sending them
//! to their owners via email.

pub mod error;
pub mod helpers;
pub mod models;
pub mod service;

pub use service::{PayrollConfig, PayrollService, RecordOutcome, RunReport};

// Re-export key types for convenience
pub use error::{ConfigError, DataError, NotifyError, RenderError};
pub use helpers::email::{Mailer, SmtpConfig, SmtpMailer};
pub use models::employee::EmployeeRecord;
