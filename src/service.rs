use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use crate::error::DataError;
use crate::helpers::{email::Mailer, pdf, spreadsheet};
use crate::models::employee::EmployeeRecord;

/// Configuration for a payroll run.
#[derive(Clone)]
pub struct PayrollConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("employees.xlsx"),
            output_dir: PathBuf::from("payslips"),
        }
    }
}

/// How processing ended for one employee record.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Payslip rendered and emailed.
    Delivered { employee_id: String },
    /// Payslip rendered but the notification failed; the file stays on disk.
    RenderedOnly { employee_id: String, error: String },
    /// Nothing was produced for this record.
    RenderFailed { employee_id: String, error: String },
}

/// Ordered per-record outcomes of one batch.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl RunReport {
    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Delivered { .. }))
            .count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// The payroll service: loads the employee table, then renders one payslip
/// per record and emails it to its owner.
pub struct PayrollService<M: Mailer> {
    mailer: M,
    config: PayrollConfig,
}

impl<M: Mailer> PayrollService<M> {
    pub fn new(mailer: M, config: PayrollConfig) -> Self {
        info!("Creating new PayrollService instance");
        Self { mailer, config }
    }

    /// Run one batch: load every record, then process each in table order.
    ///
    /// A load failure aborts the batch before any output is produced.
    /// Render and notify failures are logged, recorded in the report, and
    /// never stop the remaining records.
    pub fn run(&self) -> Result<RunReport, DataError> {
        let records = spreadsheet::load_employees(&self.config.input_path)?;
        Ok(self.process_records(&records))
    }

    /// Fold the record sequence into per-record outcomes.
    pub fn process_records(&self, records: &[EmployeeRecord]) -> RunReport {
        let outcomes = records
            .iter()
            .map(|record| self.process_record(record))
            .collect();
        RunReport { outcomes }
    }

    fn process_record(&self, record: &EmployeeRecord) -> RecordOutcome {
        let employee_id = record.employee_id.clone();

        let path = match pdf::render_payslip(record, &self.config.output_dir) {
            Ok(path) => path,
            Err(e) => {
                error!("Failed to render payslip for {}: {}", employee_id, e);
                return RecordOutcome::RenderFailed {
                    employee_id,
                    error: e.to_string(),
                };
            }
        };
        info!("Payslip generated for {} ({})", record.name, employee_id);

        match self.mailer.send_payslip(record, &path) {
            Ok(()) => RecordOutcome::Delivered { employee_id },
            Err(e) => {
                // Delivery is fire-and-forget: log, keep the rendered file,
                // move on to the next record.
                error!("Failed to send payslip to {}: {}", record.email, e);
                RecordOutcome::RenderedOnly {
                    employee_id,
                    error: e.to_string(),
                }
            }
        }
    }
}
