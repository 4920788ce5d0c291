//! Rating submission and the per-store aggregate that follows every write.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{round_aggregate, RatingService};
