//! mstrack-core
//!
//! Patients, visits, indicator results and AI diagnostics, the checks that
//! guard them at the boundary, and the key layout they are stored under.
//! Every other mstrack crate builds on these types; none of them touch disk
//! or network here.

pub mod error;
pub mod models;
pub mod store_keys;
pub mod validation;
