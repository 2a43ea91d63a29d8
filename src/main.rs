use backfill_core::constants::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_BASE_URL, DEFAULT_OWNER_PASSWORDS,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESULT_VALUE,
};
use backfill_core::{BackfillConfig, BackfillResult, Backfiller, Credentials};
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lims-backfill")]
#[command(about = "Backfill synthetic test results for a LIMS patient's assignments")]
struct Args {
    /// LIMS base URL
    #[arg(long, env = "LIMS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Administrator used for discovery and reads
    #[arg(long, env = "LIMS_ADMIN_EMAIL", default_value = DEFAULT_ADMIN_EMAIL)]
    admin_email: String,
    /// Password of the administrator
    #[arg(
        long,
        env = "LIMS_ADMIN_PASSWORD",
        default_value = DEFAULT_ADMIN_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    admin_password: String,
    /// Candidate owner passwords, tried in order (repeatable or comma-separated)
    #[arg(
        long = "owner-password",
        env = "LIMS_OWNER_PASSWORDS",
        value_delimiter = ',',
        default_values = DEFAULT_OWNER_PASSWORDS,
        hide_env_values = true,
        hide_default_value = true
    )]
    owner_passwords: Vec<String>,
    /// Value written into the first result field
    #[arg(long, env = "LIMS_RESULT_VALUE", default_value_t = DEFAULT_RESULT_VALUE)]
    result_value: f64,
    /// Per-request timeout in seconds
    #[arg(long, env = "LIMS_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,
    /// Patient to backfill (default: first patient listed by the LIMS)
    #[arg(long, env = "LIMS_PATIENT_ID")]
    patient_id: Option<String>,
}

impl Args {
    fn into_config(self) -> BackfillResult<BackfillConfig> {
        Ok(BackfillConfig::new(
            &self.base_url,
            Credentials::new(self.admin_email, self.admin_password),
            self.owner_passwords,
            self.result_value,
            Duration::from_secs(self.timeout_secs),
        )?
        .with_patient_id(self.patient_id))
    }
}

/// Main entry point for the LIMS result backfill
///
/// Logs in as the administrator, resolves one patient and submits a synthetic result for each of
/// its outstanding assignments, printing one line per assignment to stdout. Diagnostics go to
/// stderr through `tracing`.
///
/// # Environment Variables
/// Every flag has an environment fallback (`LIMS_BASE_URL`, `LIMS_ADMIN_EMAIL`,
/// `LIMS_ADMIN_PASSWORD`, `LIMS_OWNER_PASSWORDS`, `LIMS_RESULT_VALUE`, `LIMS_TIMEOUT_SECS`,
/// `LIMS_PATIENT_ID`); a `.env` file in the working directory is loaded first. `RUST_LOG`
/// controls log verbosity.
///
/// # Exit status
/// * `0` - the assignment loop completed, even if some assignments failed
/// * `1` - admin login failed, no patient was found, or the run hit a transport/decoding error
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lims_backfill=info".parse()?)
                .add_directive("backfill_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = args.into_config()?;

    tracing::info!("-- Backfilling results against {}", cfg.base_url());

    let backfiller = Backfiller::new(cfg)?;
    let mut stdout = std::io::stdout();

    match backfiller.run(&mut stdout).await {
        Ok(report) => {
            println!("{report}");
            Ok(())
        }
        Err(e) if e.is_precondition() => {
            println!("{e}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn owner_passwords_accept_repeats_and_commas() {
        let args = Args::try_parse_from([
            "lims-backfill",
            "--owner-password",
            "One@1,Two@2",
            "--owner-password",
            "Three@3",
        ])
        .expect("parse args");
        assert_eq!(args.owner_passwords, ["One@1", "Two@2", "Three@3"]);
    }

    #[test]
    fn flags_map_onto_config() {
        let args = Args::try_parse_from([
            "lims-backfill",
            "--base-url",
            "http://lims.test:8080/",
            "--result-value",
            "4.2",
            "--timeout-secs",
            "3",
            "--patient-id",
            "p-7",
        ])
        .expect("parse args");
        let cfg = args.into_config().expect("valid config");
        assert_eq!(cfg.base_url().as_str(), "http://lims.test:8080/");
        assert_eq!(cfg.result_value(), 4.2);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.patient_id(), Some("p-7"));
    }
}
