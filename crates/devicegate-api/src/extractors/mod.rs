//! Custom Axum extractors.

pub mod auth;
pub mod validated;

pub use auth::VerifiedUser;
pub use validated::{ValidatedJson, ValidatedQuery};
