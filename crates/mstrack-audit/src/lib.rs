//! mstrack-audit
//!
//! Structured audit events for clinical data changes.

pub mod events;

pub use events::AuditEvent;
