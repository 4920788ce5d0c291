//! Store catalogue: admin creation, per-user listing and the owner dashboard.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::StoreService;
