mod auth;
mod clock;
mod config;
mod db;
mod kv;
mod routes;
mod services;
mod state;
mod storage;

use std::sync::Arc;

use auth::{AuthProvider, LocalAuth, SupabaseAuth};
use config::{Config, DOCUMENT_SIZE_LIMIT};
use kv::{KvStore, MemoryKvStore, PgKvStore};
use storage::{BlobStore, MemoryBlobStore, SupabaseStorage};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");

    let kv: Arc<dyn KvStore> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections)
                .await
                .expect("database init failed");
            tracing::info!(max_connections = config.db_max_connections, "using Postgres KV store");
            Arc::new(PgKvStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory KV store (data is lost on restart)");
            Arc::new(MemoryKvStore::new())
        }
    };

    let (auth, blobs): (Arc<dyn AuthProvider>, Arc<dyn BlobStore>) = match &config.supabase {
        Some(supabase) => {
            let auth = SupabaseAuth::new(supabase, config.http_timeouts).expect("auth client init failed");
            let blobs = SupabaseStorage::new(supabase, config.documents_bucket.clone(), config.http_timeouts)
                .expect("storage client init failed");
            tracing::info!(url = %supabase.url, "using Supabase auth and storage");
            (Arc::new(auth), Arc::new(blobs))
        }
        None => {
            tracing::warn!("Supabase not configured, using local auth and in-memory document storage");
            (
                Arc::new(LocalAuth::new(kv.clone(), config.session_ttl)),
                Arc::new(MemoryBlobStore::new(config.documents_bucket.clone())),
            )
        }
    };

    // Non-fatal: uploads fail later with a clear error if the bucket is missing.
    if config.ensure_bucket {
        match blobs.ensure_bucket(DOCUMENT_SIZE_LIMIT).await {
            Ok(true) => tracing::info!(bucket = %config.documents_bucket, "created documents storage bucket"),
            Ok(false) => tracing::debug!(bucket = %config.documents_bucket, "documents bucket present"),
            Err(e) => tracing::error!(error = %e, bucket = %config.documents_bucket, "could not ensure documents bucket"),
        }
    }

    let port = config.port;
    let prefix = config.route_prefix.clone();
    let state = state::AppState::new(kv, auth, blobs, config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, %prefix, "resovista listening");
    axum::serve(listener, app).await.expect("server failed");
}
