//! Service configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Backends are chosen by which variables are present: `DATABASE_URL` turns
//! on the Postgres KV store, `SUPABASE_URL` + `SUPABASE_SERVICE_ROLE_KEY`
//! turn on hosted auth and blob storage. With neither set the service runs
//! entirely in memory, which is what local development and tests use.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ROUTE_PREFIX: &str = "/make-server-66a01e1b";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DOCUMENTS_BUCKET: &str = "make-66a01e1b-documents";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 3600;
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Documents bucket size limit (50 MiB). Also the upload body limit.
pub const DOCUMENT_SIZE_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: String, reason: String },
    #[error("{present} is set but {missing} is not")]
    Incomplete { present: String, missing: String },
}

/// Credentials for the hosted Supabase project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub route_prefix: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub supabase: Option<SupabaseConfig>,
    pub documents_bucket: String,
    /// Create the documents bucket at startup when it is missing.
    pub ensure_bucket: bool,
    pub session_ttl: Duration,
    pub http_timeouts: HttpTimeouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            route_prefix: DEFAULT_ROUTE_PREFIX.to_owned(),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            supabase: None,
            documents_bucket: DEFAULT_DOCUMENTS_BUCKET.to_owned(),
            ensure_bucket: true,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            http_timeouts: HttpTimeouts {
                request: Duration::from_secs(DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
                connect: Duration::from_secs(DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
            },
        }
    }
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `ROUTE_PREFIX`: default `/make-server-66a01e1b`; `/` or empty mounts at root
    /// - `DATABASE_URL`: Postgres KV store when set, in-memory otherwise
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `SUPABASE_URL` + `SUPABASE_SERVICE_ROLE_KEY`: hosted auth and storage
    /// - `DOCUMENTS_BUCKET`: default `make-66a01e1b-documents`
    /// - `ENSURE_DOCUMENTS_BUCKET`: default true
    /// - `SESSION_TTL_SECS`: local-auth session lifetime, default 7 days
    /// - `HTTP_REQUEST_TIMEOUT_SECS` / `HTTP_CONNECT_TIMEOUT_SECS`: 30 / 10
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric value does not parse or only one of the
    /// two Supabase variables is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = env_parse_strict("PORT", DEFAULT_PORT)?;
        let route_prefix = normalize_prefix(&env_string("ROUTE_PREFIX").unwrap_or(defaults.route_prefix));
        let database_url = env_string("DATABASE_URL");
        let db_max_connections = env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);
        let supabase = parse_supabase(env_string("SUPABASE_URL"), env_string("SUPABASE_SERVICE_ROLE_KEY"))?;
        let documents_bucket = env_string("DOCUMENTS_BUCKET").unwrap_or(defaults.documents_bucket);
        let ensure_bucket = env_bool("ENSURE_DOCUMENTS_BUCKET").unwrap_or(true);
        let session_ttl = Duration::from_secs(env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS));
        let http_timeouts = HttpTimeouts {
            request: Duration::from_secs(env_parse("HTTP_REQUEST_TIMEOUT_SECS", DEFAULT_HTTP_REQUEST_TIMEOUT_SECS)),
            connect: Duration::from_secs(env_parse("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_HTTP_CONNECT_TIMEOUT_SECS)),
        };

        Ok(Self {
            port,
            route_prefix,
            database_url,
            db_max_connections,
            supabase,
            documents_bucket,
            ensure_bucket,
            session_ttl,
            http_timeouts,
        })
    }
}

/// Trimmed, non-empty env var.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Parse an env var, falling back to `default` when unset or malformed.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env_string(key)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Parse an env var, falling back to `default` only when unset.
fn env_parse_strict<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::Invalid { key: key.to_owned(), reason: e.to_string() }),
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn parse_supabase(url: Option<String>, key: Option<String>) -> Result<Option<SupabaseConfig>, ConfigError> {
    match (url, key) {
        (Some(url), Some(service_role_key)) => Ok(Some(SupabaseConfig {
            url: url.trim_end_matches('/').to_owned(),
            service_role_key,
        })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Incomplete {
            present: "SUPABASE_URL".into(),
            missing: "SUPABASE_SERVICE_ROLE_KEY".into(),
        }),
        (None, Some(_)) => Err(ConfigError::Incomplete {
            present: "SUPABASE_SERVICE_ROLE_KEY".into(),
            missing: "SUPABASE_URL".into(),
        }),
    }
}

/// `"api/"` -> `"/api"`, `"/"` -> `""`.
pub(crate) fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
