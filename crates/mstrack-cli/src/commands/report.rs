use clap::Args;
use eyre::Result;
use uuid::Uuid;

use mstrack_core::models::indicator::{IndicatorKind, IndicatorResult, Tier};
use mstrack_indicators::ranges::{Interval, RangeTable};
use mstrack_indicators::{all_range_tables, range_table_for_code};
use mstrack_storage::ClinicalStore;
use mstrack_visit::history::visit_history;
use mstrack_visit::summary::{DEFAULT_HISTORY_LIMIT, evolution_history, indicator_summary};

use super::Context;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    pub patient: Uuid,
    /// Restrict to one indicator code, e.g. ARR or T2_new.
    #[arg(long)]
    pub indicator: Option<IndicatorKind>,
    /// Print records as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    pub visit: Uuid,
    /// Number of earlier visits to include.
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct RangesArgs {
    /// Show one indicator code only.
    #[arg(long)]
    pub indicator: Option<String>,
}

pub fn history(args: HistoryArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let records = store.indicator_history(args.patient, args.indicator)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No indicators recorded");
    }
    for r in records {
        let date = r.visit_date.to_zoned(jiff::tz::TimeZone::UTC).date();
        println!(
            "{date}  {:<6} {:>6.2}  {}",
            r.result.kind.code(),
            r.result.value,
            r.result.tier.label()
        );
    }
    Ok(())
}

pub fn summary(args: SummaryArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let visit = store.get_visit(args.visit)?;
    let current: Vec<IndicatorResult> = store
        .visit_indicators(visit.id)?
        .into_iter()
        .map(|r| r.result)
        .collect();
    let history = visit_history(&store, visit.patient_id, Some(visit.visit_number))?;

    println!("Visit #{}", visit.visit_number);
    println!("{}", indicator_summary(&current));
    println!();
    println!("{}", evolution_history(&history, args.limit));
    Ok(())
}

pub fn ranges(args: RangesArgs) -> Result<()> {
    let tables = match args.indicator {
        Some(code) => vec![range_table_for_code(&code)?],
        None => all_range_tables().to_vec(),
    };
    for table in tables {
        table.ensure_well_formed()?;
        print_table(table);
    }
    Ok(())
}

fn print_table(table: &RangeTable) {
    println!("{} ({})", table.kind.code(), table.kind.name());
    for tier in Tier::ALL {
        println!("  {:<8} {}", tier.label(), format_interval(table.interval(tier)));
    }
}

fn format_interval(interval: Interval) -> String {
    match interval.high {
        Some(high) => format!("{:.2} – {:.2}", interval.low, high),
        None => format!(">= {:.2}", interval.low),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_render_with_two_decimals() {
        assert_eq!(format_interval(Interval::bounded(0.0, 0.09)), "0.00 – 0.09");
        assert_eq!(format_interval(Interval::at_least(2.81)), ">= 2.81");
    }
}
