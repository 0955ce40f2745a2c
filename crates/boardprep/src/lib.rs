//! BoardPrep pre-registration: the multi-step enrollment wizard, its pricing rules and the relay
//! to the external registration spreadsheet.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
