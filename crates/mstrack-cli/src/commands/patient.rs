use clap::{Args, Subcommand};
use eyre::Result;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use mstrack_audit::AuditEvent;
use mstrack_audit::events::{action, resource};
use mstrack_core::models::patient::{MsType, Patient};
use mstrack_storage::ClinicalStore;

use super::Context;

#[derive(Debug, Subcommand)]
pub enum PatientCommand {
    /// Register a new patient.
    Add(AddArgs),
    /// List patients by name.
    List {
        /// Include inactive patients.
        #[arg(long)]
        all: bool,
    },
    /// Show one patient as JSON.
    Show { id: Uuid },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub age: u32,
    #[arg(long)]
    pub gender: String,
    /// rrms, spms or ppms.
    #[arg(long)]
    pub ms_type: MsType,
    /// Baseline EDSS (0.0–10.0 in 0.5 steps).
    #[arg(long)]
    pub baseline_edss: f64,
    /// Diagnosis date, YYYY-MM-DD.
    #[arg(long)]
    pub diagnosis_date: jiff::civil::Date,
    #[arg(long)]
    pub treatment: Option<String>,
}

pub fn run(cmd: PatientCommand, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    match cmd {
        PatientCommand::Add(args) => {
            let now = jiff::Timestamp::now();
            let patient = Patient {
                id: Uuid::new_v4(),
                full_name: args.name.trim().to_string(),
                age: args.age,
                gender: args.gender,
                ms_type: args.ms_type,
                baseline_edss: args.baseline_edss,
                current_treatment: args.treatment,
                diagnosis_date: args.diagnosis_date,
                active: true,
                created_at: now,
                updated_at: now,
            };
            patient.validate(jiff::Zoned::now().date())?;
            store.put_patient(&patient)?;

            AuditEvent::new(
                action::PATIENT_REGISTER,
                resource::PATIENT,
                patient.id.to_string(),
                &ctx.actor,
            )
            .with_details(json!({ "ms_type": patient.ms_type }))
            .emit();
            info!(patient_id = %patient.id, "patient registered");
            println!("{}", patient.id);
        }
        PatientCommand::List { all } => {
            let patients = store.list_patients(!all)?;
            if patients.is_empty() {
                println!("No patients registered");
            }
            for p in patients {
                println!(
                    "{}  {}  {}  EDSS {:.1}{}",
                    p.id,
                    p.full_name,
                    p.ms_type,
                    p.baseline_edss,
                    if p.active { "" } else { "  (inactive)" }
                );
            }
        }
        PatientCommand::Show { id } => {
            let patient = store.get_patient(id)?;
            println!("{}", serde_json::to_string_pretty(&patient)?);
        }
    }
    Ok(())
}
