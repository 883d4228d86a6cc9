//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use devicegate_auth::{
    AdmissionController, EvictionService, IdentityVerifier, NoticeBoard, SessionQueryService,
    SessionStore, StoreHealth, UserLocks,
};
use devicegate_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// Identity token verifier
    pub verifier: Arc<IdentityVerifier>,

    // ── Sessions ─────────────────────────────────────────────
    /// Snapshot write health
    pub health: Arc<StoreHealth>,
    /// Admission decisions
    pub admission: Arc<AdmissionController>,
    /// Logout and logout-others
    pub eviction: Arc<EvictionService>,
    /// Device listings
    pub query: Arc<SessionQueryService>,
}

impl AppState {
    /// Wires every session service around one store.
    ///
    /// The admission controller is built on the eviction service, so both
    /// act on the same store, lock registry and notice board.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn SessionStore>,
        health: Arc<StoreHealth>,
    ) -> Self {
        let verifier = Arc::new(IdentityVerifier::new(&config.auth));

        let locks = Arc::new(UserLocks::new());
        let notices = Arc::new(NoticeBoard::new(&config.session));
        let query = Arc::new(SessionQueryService::new(Arc::clone(&store)));
        let eviction = Arc::new(EvictionService::new(store, locks, notices));
        let admission = Arc::new(AdmissionController::new(
            Arc::clone(&eviction),
            Arc::clone(&health),
            &config.session,
        ));

        Self {
            config,
            verifier,
            health,
            admission,
            eviction,
            query,
        }
    }
}
