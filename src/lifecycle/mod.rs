//! Runtime orchestration and lifecycle management.
//!
//! - [`LabDashboard`] - spawns the backing services and catalog engines and wires them together
//! - [`EngineConfig`] - tunables shared by every catalog
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod config;
pub mod dashboard;
pub mod tracing;

pub use config::*;
pub use dashboard::*;
pub use self::tracing::setup_tracing;
