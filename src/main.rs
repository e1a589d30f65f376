use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use payslip_util::helpers::email::{SmtpConfig, SmtpMailer};
use payslip_util::service::{PayrollConfig, PayrollService};

fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    // Credentials are resolved before the input file is touched: a payroll
    // run without a sending account must not produce any output.
    let smtp = SmtpConfig::from_env().context("email credentials not configured")?;

    let mut config = PayrollConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        config.input_path = path.into();
    }

    let service = PayrollService::new(SmtpMailer::new(smtp), config);
    let report = service.run().context("failed to load employee data")?;

    info!(
        "Batch finished: {} delivered, {} failed of {} record(s)",
        report.delivered(),
        report.failures(),
        report.outcomes.len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("payslip_util=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
