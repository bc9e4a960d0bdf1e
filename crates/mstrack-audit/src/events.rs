use serde::Serialize;
use tracing::info;

pub mod action {
    pub const INDICATOR_UPSERT: &str = "indicator.upsert";
    pub const INDICATOR_RESET: &str = "indicator.reset";
    pub const VISIT_COMPLETE: &str = "visit.complete";
    pub const ALERT_FORWARD: &str = "alert.forward";
    pub const PATIENT_REGISTER: &str = "patient.register";
    pub const VISIT_SCHEDULE: &str = "visit.schedule";
    pub const DIAGNOSIS_RECORD: &str = "diagnosis.record";
}

pub mod resource {
    pub const INDICATOR: &str = "indicator";
    pub const VISIT: &str = "visit";
    pub const PATIENT: &str = "patient";
    pub const DIAGNOSIS: &str = "diagnosis";
}

/// A structured audit event for a change to clinical data.
///
/// Events are logged via `tracing` under the `audit` target so they can be
/// routed separately from operational logs.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub actor: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            actor: actor.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            target: "audit",
            {
                audit.action = %self.action,
                audit.resource_type = %self.resource_type,
                audit.resource_id = %self.resource_id,
                audit.actor = %self.actor,
                audit.details = %details
            },
            "audit event"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use serde_json::json;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn builder_sets_details() {
        let event =
            AuditEvent::new(action::INDICATOR_UPSERT, resource::INDICATOR, "v1/ARR", "clinician")
                .with_details(json!({ "tier": "critical" }));
        assert_eq!(event.action, "indicator.upsert");
        assert_eq!(event.details, Some(json!({ "tier": "critical" })));
        event.emit();
    }

    #[test]
    fn serializes_all_fields() {
        let event = AuditEvent::new(action::VISIT_COMPLETE, resource::VISIT, "v1", "cli");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["resource_type"], "visit");
        assert_eq!(json["details"], serde_json::Value::Null);
    }

    #[test]
    fn emit_logs_under_audit_target_with_fields() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            AuditEvent::new(action::VISIT_COMPLETE, resource::VISIT, "v42", "dr-lopez")
                .with_details(json!({ "visit_number": 3 }))
                .emit();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("audit:"), "{output}");
        assert!(output.contains("audit.action=visit.complete"), "{output}");
        assert!(output.contains("audit.resource_id=v42"), "{output}");
        assert!(output.contains("audit.actor=dr-lopez"), "{output}");
        assert!(output.contains(r#"audit.details={"visit_number":3}"#), "{output}");
    }
}
