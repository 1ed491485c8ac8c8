pub mod admin;
pub mod auth;

use std::sync::Arc;

use hearth_core::{RevocationStore, TokenCleanupConfig, TokenCleanupService, TokenService};

/// Shared application state handed to every handler
pub struct AppState<S: RevocationStore + 'static> {
    pub token_service: Arc<TokenService<S>>,
    pub cleanup_service: Arc<TokenCleanupService<S>>,
}

impl<S: RevocationStore + 'static> AppState<S> {
    pub fn new(token_service: Arc<TokenService<S>>, cleanup_config: TokenCleanupConfig) -> Self {
        let cleanup_service = Arc::new(TokenCleanupService::for_service(&token_service, cleanup_config));
        Self {
            token_service,
            cleanup_service,
        }
    }
}
