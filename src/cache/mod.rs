//! Per-project cache locations

pub mod paths;

pub use paths::{get_cache_dir, get_records_dir};
