//! Domain entities carried inside and alongside signed tokens.

mod claims;
mod role;
mod token;

// Re-export commonly used types
pub use claims::{AccessClaims, IdentityInfo, RefreshClaims, TokenUse};
pub use role::Role;
pub use token::{TokenPair, TOKEN_TYPE_BEARER};
