pub mod diagnostic;
pub mod indicator;
pub mod patient;
pub mod visit;
