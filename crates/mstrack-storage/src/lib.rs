//! mstrack-storage
//!
//! The storage capability used by the visit workflow, and a key-value
//! backend that implements it either in memory or over a JSON file.

pub mod error;
pub mod file;
pub mod objects;
pub mod state;
pub mod store;

pub use store::{ClinicalStore, ObjectStore};
