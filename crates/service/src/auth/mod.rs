//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, session tokens, role checks and password changes
//! live here; HTTP concerns stay in the server crate.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use service::{require_role, AuthConfig, AuthService};
