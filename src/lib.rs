//! shipready - release-readiness scoring for Python desktop projects
//!
//! Five read-only analyzers inspect a project directory concurrently, a
//! table-driven scorer turns their reports into six dimension scores and a
//! tiered verdict, and the whole run is persisted as a JSON record.

pub mod analyzers;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reporters;
pub mod scanner;
pub mod scoring;

pub use error::{ParseError, ReadinessError, ReadinessResult};
pub use pipeline::{Pipeline, RunOutcome};
