//! Token cleanup service for periodic maintenance of the revocation store
//!
//! Revoked tokens only need to be remembered until they would have expired
//! anyway. This module sweeps entries past that point out of stores that do
//! not expire their own entries.

use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::DomainError;
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::service::TokenService;

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether the periodic background sweep runs; manual sweeps always run
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300, // Run every 5 minutes
            enabled: true,
        }
    }
}

impl From<&hearth_shared::config::RevocationConfig> for TokenCleanupConfig {
    fn from(config: &hearth_shared::config::RevocationConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval,
            enabled: config.cleanup_enabled,
        }
    }
}

/// Whether a sweep is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Idle,
    Sweeping,
}

/// Service for removing expired and unparseable entries from a revocation store
pub struct TokenCleanupService<S: RevocationStore + 'static> {
    store: Arc<S>,
    codec: Arc<TokenCodec>,
    config: TokenCleanupConfig,
    sweeping: AtomicBool,
}

/// Resets the sweep flag when a sweep ends, including by error
struct SweepGuard<'a>(&'a AtomicBool);

impl<'a> SweepGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: RevocationStore + 'static> TokenCleanupService<S> {
    /// Create a new token cleanup service
    pub fn new(store: Arc<S>, codec: Arc<TokenCodec>, config: TokenCleanupConfig) -> Self {
        Self {
            store,
            codec,
            config,
            sweeping: AtomicBool::new(false),
        }
    }

    /// Create a cleanup service sweeping the store of a token service
    pub fn for_service(service: &TokenService<S>, config: TokenCleanupConfig) -> Self {
        Self::new(service.store(), service.codec(), config)
    }

    pub fn state(&self) -> SweepState {
        if self.sweeping.load(Ordering::Acquire) {
            SweepState::Sweeping
        } else {
            SweepState::Idle
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Every entry whose embedded expiry has passed is removed, and so is every
    /// entry that cannot be parsed at all. The expiry is read without checking
    /// the signature. A cycle that starts while another is still running is
    /// skipped. Runs whether or not the periodic sweep is enabled.
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of cleanup operations
    /// * `Err(DomainError)` - The store failed mid-sweep
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if self.store.is_self_expiring() {
            debug!("Revocation store expires its own entries; nothing to sweep");
            return Ok(CleanupResult::default());
        }

        let Some(_guard) = SweepGuard::acquire(&self.sweeping) else {
            warn!("Revocation sweep already in progress; skipping this cycle");
            return Ok(CleanupResult::skipped());
        };

        debug!("Starting revocation sweep");

        let mut result = CleanupResult::default();
        let now = Utc::now();

        for token in self.store.tokens().await? {
            result.entries_scanned += 1;
            match self.codec.peek_expiry(&token) {
                Ok(expires_at) if expires_at <= now => {
                    if self.store.remove(&token).await? {
                        result.expired_removed += 1;
                    }
                }
                Ok(_) => {}
                Err(_) => {
                    if self.store.remove(&token).await? {
                        result.malformed_removed += 1;
                    }
                }
            }
        }

        info!(
            "Revocation sweep completed - Scanned: {}, Expired: {}, Malformed: {}",
            result.entries_scanned, result.expired_removed, result.malformed_removed
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// This spawns a tokio task that runs cleanup at regular intervals. Abort
    /// the returned handle to stop it. Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("Token cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    /// Number of store entries examined
    pub entries_scanned: usize,
    /// Number of entries removed because the token expired
    pub expired_removed: usize,
    /// Number of entries removed because the token could not be parsed
    pub malformed_removed: usize,
    /// Whether the cycle was skipped because another sweep was running
    pub skipped: bool,
}

impl CleanupResult {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }

    /// Get total number of entries removed
    pub fn total_removed(&self) -> usize {
        self.expired_removed + self.malformed_removed
    }
}
