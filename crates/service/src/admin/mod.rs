//! Administrator reads: user directory and platform counters.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AdminService;
