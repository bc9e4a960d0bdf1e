use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::validation;

/// Whose diagnosis the physician adopted for a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiagnosisSource {
    Deepseek,
    Copilot,
    /// The physician overrode both model opinions.
    Physician,
}

impl DiagnosisSource {
    pub const ALL: [DiagnosisSource; 3] = [
        DiagnosisSource::Deepseek,
        DiagnosisSource::Copilot,
        DiagnosisSource::Physician,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DiagnosisSource::Deepseek => "DeepSeek",
            DiagnosisSource::Copilot => "Copilot",
            DiagnosisSource::Physician => "Physician",
        }
    }
}

impl fmt::Display for DiagnosisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DiagnosisSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deepseek" => Ok(DiagnosisSource::Deepseek),
            "copilot" => Ok(DiagnosisSource::Copilot),
            "physician" | "override" => Ok(DiagnosisSource::Physician),
            _ => Err(CoreError::invalid(
                "selected",
                format!("unknown diagnosis source {s:?}, expected deepseek, copilot or physician"),
            )),
        }
    }
}

/// One model's diagnostic opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiOpinion {
    pub diagnosis: String,
    /// Self-reported confidence, 0–10.
    pub confidence: Option<f64>,
}

/// The AI opinions gathered for a visit and the physician's choice between
/// them. At most one is stored per visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiDiagnostic {
    pub visit_id: Uuid,
    pub deepseek: Option<AiOpinion>,
    pub copilot: Option<AiOpinion>,
    pub selected: DiagnosisSource,
    /// Required when `selected` is [`DiagnosisSource::Physician`].
    pub physician_diagnosis: Option<String>,
    pub physician_justification: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl AiDiagnostic {
    /// The diagnosis that was adopted, if the chosen source supplied one.
    pub fn adopted_diagnosis(&self) -> Option<&str> {
        match self.selected {
            DiagnosisSource::Deepseek => self.deepseek.as_ref().map(|o| o.diagnosis.as_str()),
            DiagnosisSource::Copilot => self.copilot.as_ref().map(|o| o.diagnosis.as_str()),
            DiagnosisSource::Physician => self.physician_diagnosis.as_deref(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, opinion) in [
            ("deepseek.confidence", &self.deepseek),
            ("copilot.confidence", &self.copilot),
        ] {
            if let Some(confidence) = opinion.as_ref().and_then(|o| o.confidence) {
                validation::validate_confidence(field, confidence)?;
            }
        }

        let adopted = self.adopted_diagnosis().map(str::trim).unwrap_or_default();
        if adopted.is_empty() {
            let field = match self.selected {
                DiagnosisSource::Deepseek => "deepseek",
                DiagnosisSource::Copilot => "copilot",
                DiagnosisSource::Physician => "physician_diagnosis",
            };
            return Err(CoreError::invalid(
                field,
                format!("{} was selected but gave no diagnosis", self.selected),
            ));
        }
        Ok(())
    }
}

/// How often each source's diagnosis was adopted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiSelectionMetrics {
    pub total_consultations: u32,
    pub deepseek_selections: u32,
    pub copilot_selections: u32,
    pub physician_overrides: u32,
}

impl AiSelectionMetrics {
    pub fn from_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a AiDiagnostic>) -> Self {
        let mut metrics = Self::default();
        for d in diagnostics {
            metrics.total_consultations += 1;
            match d.selected {
                DiagnosisSource::Deepseek => metrics.deepseek_selections += 1,
                DiagnosisSource::Copilot => metrics.copilot_selections += 1,
                DiagnosisSource::Physician => metrics.physician_overrides += 1,
            }
        }
        metrics
    }

    pub fn selections(&self, source: DiagnosisSource) -> u32 {
        match source {
            DiagnosisSource::Deepseek => self.deepseek_selections,
            DiagnosisSource::Copilot => self.copilot_selections,
            DiagnosisSource::Physician => self.physician_overrides,
        }
    }

    /// Share of consultations that adopted `source`, as a percentage.
    /// `None` before any consultation has been recorded.
    pub fn selection_rate(&self, source: DiagnosisSource) -> Option<f64> {
        if self.total_consultations == 0 {
            return None;
        }
        Some(f64::from(self.selections(source)) / f64::from(self.total_consultations) * 100.0)
    }
}
