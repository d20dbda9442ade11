//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the three backends (KV store, identity provider, blob store) as
//! trait objects so the same router runs against Postgres + Supabase in
//! production and in-memory backends in tests, plus the shared id clock.

use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::clock::IdClock;
use crate::config::Config;
use crate::kv::KvStore;
use crate::storage::BlobStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KvStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub blobs: Arc<dyn BlobStore>,
    pub ids: IdClock,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>, auth: Arc<dyn AuthProvider>, blobs: Arc<dyn BlobStore>, config: Config) -> Self {
        Self { kv, auth, blobs, ids: IdClock::new(), config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
