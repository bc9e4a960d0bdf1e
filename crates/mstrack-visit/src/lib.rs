//! mstrack-visit
//!
//! The visit workflow around the indicator engine: validate a visit's
//! measurements, run the five calculators, persist the results, and
//! forward critical findings. Also records the physician's choice between
//! AI diagnostic opinions and tallies those choices.

pub mod diagnosis;
pub mod error;
pub mod evaluate;
pub mod history;
pub mod record;
pub mod summary;

pub use diagnosis::{diagnosis_metrics, record_diagnosis};
pub use evaluate::{VisitIndicators, evaluate_visit};
pub use record::{RecordedVisit, clear_visit_results, record_visit};
