use crate::errors::BundleError;
use crate::fetcher::read_content;
use crate::ignore::ExclusionPolicy;
use crate::reader::read_directory;
use crate::tree::DirectoryEntry;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Where directory trees and file contents come from.
///
/// `dir` is the directory string as the user typed it; each source resolves
/// it its own way.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    async fn list(&self, dir: &str) -> Result<Vec<DirectoryEntry>, BundleError>;

    async fn fetch(&self, dir: &str, path: &str) -> Result<String, BundleError>;
}

/// Reads the local filesystem in-process, resolving `dir` against a base
/// directory (normally the working directory).
#[derive(Debug, Clone)]
pub struct LocalSource {
    base: PathBuf,
    policy: Arc<ExclusionPolicy>,
}

impl LocalSource {
    pub fn new(base: PathBuf, policy: ExclusionPolicy) -> Self {
        LocalSource {
            base,
            policy: Arc::new(policy),
        }
    }

    pub fn resolve_dir(&self, dir: &str) -> PathBuf {
        self.base.join(dir)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

#[async_trait]
impl ProjectSource for LocalSource {
    async fn list(&self, dir: &str) -> Result<Vec<DirectoryEntry>, BundleError> {
        let root = self.resolve_dir(dir);
        let policy = self.policy.clone();
        tokio::task::spawn_blocking(move || read_directory(&root, &policy))
            .await
            .map_err(|e| BundleError::DirectoryLoadError(e.to_string()))
    }

    async fn fetch(&self, dir: &str, path: &str) -> Result<String, BundleError> {
        read_content(&self.resolve_dir(dir), path).await
    }
}

/// Talks to a running `codebundle serve` instance.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpSource {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    async fn error_from_response(response: Response) -> BundleError {
        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        match status {
            StatusCode::BAD_REQUEST => BundleError::InvalidPath(message),
            StatusCode::FORBIDDEN => BundleError::AccessDenied(message),
            _ => BundleError::ReadError(message),
        }
    }
}

#[async_trait]
impl ProjectSource for HttpSource {
    async fn list(&self, dir: &str) -> Result<Vec<DirectoryEntry>, BundleError> {
        let url = format!("{}/files", self.base_url);
        debug!("Requesting tree for '{}' from {}", dir, url);
        let response = self
            .client
            .get(&url)
            .query(&[("dir", dir)])
            .send()
            .await
            .map_err(|e| BundleError::DirectoryLoadError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BundleError::DirectoryLoadError(format!(
                "{} answered {}",
                url, status
            )));
        }

        response
            .json::<Vec<DirectoryEntry>>()
            .await
            .map_err(|e| BundleError::DirectoryLoadError(e.to_string()))
    }

    async fn fetch(&self, dir: &str, path: &str) -> Result<String, BundleError> {
        let url = format!("{}/content", self.base_url);
        trace!("Requesting content of '{}' from {}", path, url);
        let response = self
            .client
            .get(&url)
            .query(&[("file", path), ("dir", dir)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.text().await?)
    }
}
