//! Verification of identity provider tokens.

pub mod claims;
pub mod verifier;

pub use claims::IdentityClaims;
pub use verifier::IdentityVerifier;
