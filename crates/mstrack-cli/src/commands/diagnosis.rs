use clap::{Args, Subcommand};
use eyre::Result;
use uuid::Uuid;

use mstrack_core::models::diagnostic::{
    AiDiagnostic, AiOpinion, AiSelectionMetrics, DiagnosisSource,
};
use mstrack_storage::ClinicalStore;
use mstrack_visit::{diagnosis_metrics, record_diagnosis};

use super::Context;

#[derive(Debug, Subcommand)]
pub enum DiagnosisCommand {
    /// Record the AI opinions for a visit and which one was adopted.
    Record(RecordArgs),
    /// Show a visit's AI diagnostic as JSON.
    Show { visit: Uuid },
    /// Count how often each source's diagnosis was adopted.
    Metrics {
        /// First day included, YYYY-MM-DD.
        #[arg(long)]
        from: Option<jiff::civil::Date>,
        /// Last day included, YYYY-MM-DD.
        #[arg(long)]
        to: Option<jiff::civil::Date>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    pub visit: Uuid,
    #[arg(long)]
    pub deepseek: Option<String>,
    /// 0–10.
    #[arg(long)]
    pub deepseek_confidence: Option<f64>,
    #[arg(long)]
    pub copilot: Option<String>,
    /// 0–10.
    #[arg(long)]
    pub copilot_confidence: Option<f64>,
    /// deepseek, copilot or physician.
    #[arg(long)]
    pub selected: DiagnosisSource,
    /// The physician's own diagnosis, required with `--selected physician`.
    #[arg(long = "override")]
    pub physician_diagnosis: Option<String>,
    #[arg(long)]
    pub justification: Option<String>,
}

impl RecordArgs {
    fn into_diagnostic(self, now: jiff::Timestamp) -> Result<AiDiagnostic> {
        Ok(AiDiagnostic {
            visit_id: self.visit,
            deepseek: opinion("deepseek", self.deepseek, self.deepseek_confidence)?,
            copilot: opinion("copilot", self.copilot, self.copilot_confidence)?,
            selected: self.selected,
            physician_diagnosis: self.physician_diagnosis,
            physician_justification: self.justification,
            created_at: now,
        })
    }
}

fn opinion(
    source: &str,
    diagnosis: Option<String>,
    confidence: Option<f64>,
) -> Result<Option<AiOpinion>> {
    match (diagnosis, confidence) {
        (Some(diagnosis), confidence) => Ok(Some(AiOpinion {
            diagnosis,
            confidence,
        })),
        (None, None) => Ok(None),
        (None, Some(_)) => eyre::bail!("--{source}-confidence given without --{source}"),
    }
}

pub fn run(cmd: DiagnosisCommand, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    match cmd {
        DiagnosisCommand::Record(args) => {
            let diagnostic = args.into_diagnostic(jiff::Timestamp::now())?;
            record_diagnosis(&mut store, &diagnostic, &ctx.actor)?;
            println!("visit {}: {} diagnosis adopted", diagnostic.visit_id, diagnostic.selected);
        }
        DiagnosisCommand::Show { visit } => {
            let diagnostic = store.get_diagnostic(visit)?;
            println!("{}", serde_json::to_string_pretty(&diagnostic)?);
        }
        DiagnosisCommand::Metrics { from, to, json } => {
            let metrics = diagnosis_metrics(&store, from, to)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print!("{}", format_metrics(&metrics));
            }
        }
    }
    Ok(())
}

fn format_metrics(metrics: &AiSelectionMetrics) -> String {
    let mut out = format!("Total consultations: {}\n", metrics.total_consultations);
    for source in DiagnosisSource::ALL {
        let rate = metrics
            .selection_rate(source)
            .map(|r| format!("{r:.1}%"))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "  {:<10} {:>4}  {rate}\n",
            source.label(),
            metrics.selections(source)
        ));
    }
    out
}
