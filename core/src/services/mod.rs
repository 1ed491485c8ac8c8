//! Business services containing the token lifecycle.

pub mod token;

// Re-export commonly used types
pub use token::{
    extract_token_from_header, CleanupResult, RefreshPolicy, SweepState, TokenCleanupConfig,
    TokenCleanupService, TokenCodec, TokenService, TokenServiceConfig,
};
