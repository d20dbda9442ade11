//! Supabase Storage REST client bound to a single bucket.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use super::{BlobError, BlobStore};
use crate::config::{HttpTimeouts, SupabaseConfig};

pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
    service_role_key: String,
    bucket: String,
}

#[derive(Deserialize)]
struct WireBucket {
    name: String,
}

#[derive(Deserialize)]
struct WireSignedUrl {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

impl SupabaseStorage {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig, bucket: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, BlobError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request)
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| BlobError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.clone(),
            service_role_key: config.service_role_key.clone(),
            bucket: bucket.into(),
        })
    }

    /// `{base}/storage/v1/{segments...}/{bucket}/{path}` with each path
    /// segment percent-encoded.
    fn object_url(&self, segments: &[&str], path: &str) -> Result<Url, BlobError> {
        let mut url = Url::parse(&format!("{}/storage/v1", self.base_url)).map_err(|e| BlobError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| BlobError::Transport("storage base URL cannot be a base".into()))?
            .extend(segments)
            .push(&self.bucket)
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, BlobError> {
        let response = self
            .authed(builder)
            .send()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(BlobError::Response { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

#[async_trait]
impl BlobStore for SupabaseStorage {
    async fn ensure_bucket(&self, size_limit: usize) -> Result<bool, BlobError> {
        let body = self
            .send(self.http.get(format!("{}/storage/v1/bucket", self.base_url)))
            .await?;
        if bucket_listed(&body, &self.bucket)? {
            return Ok(false);
        }

        self.send(self.http.post(format!("{}/storage/v1/bucket", self.base_url)).json(&json!({
            "id": self.bucket,
            "name": self.bucket,
            "public": false,
            "file_size_limit": size_limit,
        })))
        .await?;
        Ok(true)
    }

    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BlobError> {
        let url = self.object_url(&["object"], path)?;
        self.send(
            self.http
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes),
        )
        .await?;
        Ok(())
    }

    async fn signed_url(&self, path: &str, expires_in: Duration) -> Result<String, BlobError> {
        let url = self.object_url(&["object", "sign"], path)?;
        let body = self
            .send(self.http.post(url).json(&json!({ "expiresIn": expires_in.as_secs() })))
            .await?;
        parse_signed_url(&self.base_url, &body)
    }

    async fn remove(&self, paths: &[String]) -> Result<(), BlobError> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);
        self.send(self.http.delete(url).json(&json!({ "prefixes": paths })))
            .await?;
        Ok(())
    }
}

pub(crate) fn bucket_listed(body: &str, bucket: &str) -> Result<bool, BlobError> {
    let buckets: Vec<WireBucket> = serde_json::from_str(body).map_err(|e| BlobError::Transport(e.to_string()))?;
    Ok(buckets.iter().any(|b| b.name == bucket))
}

/// The API returns a path relative to `/storage/v1`; absolute it.
pub(crate) fn parse_signed_url(base_url: &str, body: &str) -> Result<String, BlobError> {
    let wire: WireSignedUrl = serde_json::from_str(body).map_err(|e| BlobError::Transport(e.to_string()))?;
    if wire.signed_url.starts_with("http://") || wire.signed_url.starts_with("https://") {
        return Ok(wire.signed_url);
    }
    let relative = wire.signed_url.trim_start_matches('/');
    Ok(format!("{base_url}/storage/v1/{relative}"))
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;
