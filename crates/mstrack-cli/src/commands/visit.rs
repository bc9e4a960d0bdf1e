use clap::{Args, Subcommand};
use eyre::Result;
use serde_json::json;
use uuid::Uuid;

use mstrack_audit::AuditEvent;
use mstrack_audit::events::{action, resource};
use mstrack_core::models::visit::{Visit, VisitMeasurements, VisitStatus};
use mstrack_storage::ClinicalStore;
use mstrack_visit::{clear_visit_results, record_visit};

use super::{Context, parse_when};

#[derive(Debug, Subcommand)]
pub enum VisitCommand {
    /// Schedule a visit for a patient.
    Add {
        #[arg(long)]
        patient: Uuid,
        /// Visit date, YYYY-MM-DD or RFC 3339.
        #[arg(long)]
        date: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List a patient's visits, most recent first.
    List {
        #[arg(long)]
        patient: Uuid,
    },
    /// Pending visits due within the next N days.
    Pending {
        #[arg(long, default_value_t = 7)]
        within_days: i64,
    },
    /// Cancel a pending visit.
    Cancel { id: Uuid },
    /// Record measurements and compute the visit's indicators.
    Evaluate(EvaluateArgs),
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    pub visit: Uuid,
    /// Relapses since diagnosis.
    #[arg(long)]
    pub relapses: i64,
    /// Gadolinium-enhancing T1 lesions.
    #[arg(long = "t1-gd")]
    pub t1_gd: i64,
    /// Total T2 lesion count.
    #[arg(long)]
    pub t2: i64,
    /// Current EDSS.
    #[arg(long)]
    pub edss: f64,
    /// Clear the visit's stored results before evaluating.
    #[arg(long)]
    pub reset: bool,
}

pub fn run(cmd: VisitCommand, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let now = jiff::Timestamp::now();
    match cmd {
        VisitCommand::Add {
            patient,
            date,
            notes,
        } => {
            let mut visit = Visit::scheduled(patient, parse_when(&date)?, now);
            visit.notes = notes;
            let visit = store.create_visit(visit)?;
            AuditEvent::new(
                action::VISIT_SCHEDULE,
                resource::VISIT,
                visit.id.to_string(),
                &ctx.actor,
            )
            .with_details(json!({ "visit_number": visit.visit_number }))
            .emit();
            println!("{}  visit #{}", visit.id, visit.visit_number);
        }
        VisitCommand::List { patient } => {
            for v in store.list_patient_visits(patient)? {
                print_visit(&v);
            }
        }
        VisitCommand::Pending { within_days } => {
            let cutoff = now.checked_add(jiff::SignedDuration::from_hours(24 * within_days))?;
            let due = store.pending_visits_before(cutoff)?;
            if due.is_empty() {
                println!("No pending visits");
            }
            for v in due {
                print_visit(&v);
            }
        }
        VisitCommand::Cancel { id } => {
            let mut visit = store.get_visit(id)?;
            if visit.status != VisitStatus::Pending {
                eyre::bail!(
                    "visit {id} is {:?}, only pending visits can be cancelled",
                    visit.status
                );
            }
            visit.status = VisitStatus::Cancelled;
            visit.updated_at = now;
            store.put_visit(&visit)?;
            println!("visit #{} cancelled", visit.visit_number);
        }
        VisitCommand::Evaluate(args) => {
            let measurements = VisitMeasurements {
                relapse_count: args.relapses,
                t1_gd_lesions: args.t1_gd,
                t2_lesions: args.t2,
                current_edss: args.edss,
            };
            if args.reset {
                // Refuse bad input before anything is deleted.
                measurements.validate()?;
                let removed = clear_visit_results(&mut store, args.visit, &ctx.actor)?;
                println!("cleared {removed} stored result(s)");
            }
            let alerts = ctx.alert_sink();
            let recorded = record_visit(
                &mut store,
                alerts.as_ref(),
                args.visit,
                &measurements,
                &ctx.actor,
                now,
            )?;

            println!("Visit #{} completed", recorded.visit.visit_number);
            for r in recorded.indicators.iter() {
                println!(
                    "{:<6} {:>6.2}  {:<8}  {}",
                    r.kind.code(),
                    r.value,
                    r.tier.label(),
                    r.justification
                );
            }
            if recorded.alerts_failed > 0 {
                eprintln!(
                    "warning: {} critical alert(s) could not be delivered",
                    recorded.alerts_failed
                );
            }
        }
    }
    Ok(())
}

fn print_visit(v: &Visit) {
    let date = v.visit_date.to_zoned(jiff::tz::TimeZone::UTC).date();
    println!(
        "{}  #{}  {date}  {:?}  patient {}",
        v.id, v.visit_number, v.status, v.patient_id
    );
}
