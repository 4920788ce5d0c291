//! Typed client for the store-rating API plus the session context a
//! front end keeps between requests.

pub mod api;
pub mod errors;
pub mod session;

pub use api::ApiClient;
pub use errors::ClientError;
pub use session::{Dashboard, SessionContext, SessionState};
