//! Command-line interface wiring for mstrack.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

use mstrack_alerts::{AlertSink, NoopAlertSink, WebhookAlertSink};
use mstrack_storage::ObjectStore;

use crate::config::MstrackConfig;

pub mod diagnosis;
pub mod patient;
pub mod report;
pub mod settings;
pub mod visit;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Multiple Sclerosis clinical indicator tracking",
    long_about = None
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data file, overriding the config and `MSTRACK_DATA`.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Name recorded as the actor in audit events.
    #[arg(long, global = true, default_value = "cli")]
    pub actor: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register and list patients.
    #[command(subcommand)]
    Patient(patient::PatientCommand),
    /// Schedule visits and record their measurements.
    #[command(subcommand)]
    Visit(visit::VisitCommand),
    /// Record and review AI diagnostic opinions.
    #[command(subcommand)]
    Diagnosis(diagnosis::DiagnosisCommand),
    /// Show a patient's indicator history.
    History(report::HistoryArgs),
    /// Summarize a visit's indicators and the patient's recent evolution.
    Summary(report::SummaryArgs),
    /// Print the classification range tables.
    Ranges(report::RangesArgs),
    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(settings::ConfigCommand),
}

/// Resolved settings shared by every command.
pub struct Context {
    pub config: MstrackConfig,
    pub config_path: PathBuf,
    pub actor: String,
}

impl Context {
    pub fn open_store(&self) -> Result<ObjectStore> {
        Ok(ObjectStore::open(&self.config.data_path)?)
    }

    pub fn alert_sink(&self) -> Box<dyn AlertSink> {
        match &self.config.alert_webhook_url {
            Some(url) => {
                let sink = WebhookAlertSink::new(url.clone());
                tracing::debug!(url = sink.url(), "forwarding critical alerts");
                Box::new(sink)
            }
            None => Box::new(NoopAlertSink),
        }
    }
}

impl Cli {
    /// Dispatch the selected sub-command.
    pub fn dispatch(self, ctx: Context) -> Result<()> {
        match self.command {
            Commands::Patient(cmd) => patient::run(cmd, &ctx),
            Commands::Visit(cmd) => visit::run(cmd, &ctx),
            Commands::Diagnosis(cmd) => diagnosis::run(cmd, &ctx),
            Commands::History(args) => report::history(args, &ctx),
            Commands::Summary(args) => report::summary(args, &ctx),
            Commands::Ranges(args) => report::ranges(args),
            Commands::Config(cmd) => settings::run(cmd, &ctx),
        }
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_when(s: &str) -> Result<jiff::Timestamp> {
    if let Ok(ts) = s.parse::<jiff::Timestamp>() {
        return Ok(ts);
    }
    let date: jiff::civil::Date = s
        .parse()
        .map_err(|e| eyre::eyre!("invalid date {s:?}: {e}"))?;
    Ok(date.to_zoned(jiff::tz::TimeZone::UTC)?.timestamp())
}
