//! # Hearth Core
//!
//! Session token lifecycle for the Hearth backend: claim sets, signing and
//! verification, the revocation store, the token service that ties them
//! together, and the sweeper that keeps the store bounded.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
