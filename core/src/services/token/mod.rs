//! Token service module for session token management
//!
//! This module handles all token-related operations including:
//! - Signing and verifying access and refresh tokens
//! - Issuing and rotating token pairs
//! - Token revocation
//! - Background cleanup of expired revocation entries

mod cleanup;
mod codec;
mod config;
mod header;
mod service;


pub use cleanup::{CleanupResult, SweepState, TokenCleanupConfig, TokenCleanupService};
pub use codec::TokenCodec;
pub use config::{RefreshPolicy, TokenServiceConfig, MAX_TOKEN_LIFETIME_DAYS};
pub use header::extract_token_from_header;
pub use service::TokenService;
