//! Error types for the payslip pipeline.
//!
//! One enum per failure domain. Whether an error aborts the batch is decided
//! by the orchestrator, not here: `ConfigError` and `DataError` are treated
//! as fatal, `RenderError` and `NotifyError` are contained per record.

use thiserror::Error;

/// Missing or unusable credentials, detected before any input is read.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("environment variable {0} is set but empty")]
    EmptyVar(&'static str),
}

/// Failure while loading the employee table.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook contains no sheets")]
    NoSheet,

    #[error("required column {0:?} is missing from the table")]
    MissingColumn(&'static str),

    /// Row numbers are 1-based spreadsheet rows, header included.
    #[error("row {row} has no value in required column {column:?}")]
    MissingCell { row: usize, column: &'static str },

    #[error("row {row}, column {column:?}: {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Failure while rendering or writing one payslip.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to build payslip document: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to write payslip: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while delivering one payslip.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("invalid attachment content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    #[error("failed to read attachment: {0}")]
    Attachment(#[from] std::io::Error),

    #[error("SMTP failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
