//! Shared application service layer for the stepwise EPANET tools.
//!
//! This crate sits between the command line and the engine: it turns a run
//! configuration into resolved export requests, drives the hydraulic session
//! one step at a time, and feeds every step to the CSV exporters and any
//! additional observers.

pub mod config;
pub mod error;
pub mod observer;
pub mod run_service;
pub mod session;

// Re-export key types for convenience
pub use config::{RunConfig, load_config};
pub use error::{AppError, AppResult};
pub use observer::{NodeStateReport, RunStart, StepObserver};
pub use run_service::{
    ExportPlan, RunSummary, SolveSummary, StepwiseOptions, plan_exports, run_single, run_stepwise,
};
pub use session::HydraulicSession;
