//! Shared HTTP payload types and process-wide utilities.

pub mod types;
pub mod utils;
