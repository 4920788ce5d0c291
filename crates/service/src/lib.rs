//! Service layer holding the business rules of the store-rating backend.
//! - Auth: registration, login, session tokens, role checks, password changes.
//! - Store and rating: catalogue listing, owner dashboard, rating upsert and aggregate upkeep.
//! - Admin: user listing and platform counters.
//!
//! Every service talks to a repository trait; `seaorm` implementations back
//! production and `mock::MockRepository` backs tests.

pub mod errors;
pub mod auth;
pub mod store;
pub mod rating;
pub mod admin;
pub mod mock;
#[cfg(test)]
pub mod test_support;
