//! Villaflow Booking Automation Core
//!
//! The ingestion and approval automation pipeline for a villa/property-rental
//! operator: idempotent booking persistence, property-to-owner matching with
//! confidence scoring, a best-effort approval orchestrator, a template-driven
//! staff task generator and a small condition/action rule evaluator.
//!
//! The crate owns no HTTP surface; upstream webhook handlers call into
//! [`services::Services`]. The document store, notification sender and
//! financial reporting collaborators are injected as traits so embedders and
//! tests can substitute their own backends.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
