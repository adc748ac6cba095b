use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{LayoutError, LayoutResult};

/// Where raw `.DS_Store` bytes come from.
///
/// Paths are `/`-separated and relative to the source's root; a leading `/`
/// is ignored.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the asset at `path`.
    ///
    /// Returns [`LayoutError::NotFound`] if nothing exists there.
    async fn fetch(&self, path: &str) -> LayoutResult<Vec<u8>>;
}

/// Serves assets from a directory on disk.
#[derive(Clone, Debug)]
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an asset path below the root. Parent and absolute components are
    /// rejected.
    fn resolve(&self, path: &str) -> LayoutResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || !relative.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(LayoutError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetSource for FileAssetSource {
    async fn fetch(&self, path: &str) -> LayoutResult<Vec<u8>> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LayoutError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `HashMap`-backed source for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAssetSource {
    assets: HashMap<String, Vec<u8>>,
}

impl InMemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, builder style.
    pub fn with_asset(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Add or replace an asset.
    pub fn insert(&mut self, path: &str, bytes: Vec<u8>) {
        self.assets
            .insert(path.trim_start_matches('/').to_string(), bytes);
    }
}

#[async_trait]
impl AssetSource for InMemoryAssetSource {
    async fn fetch(&self, path: &str) -> LayoutResult<Vec<u8>> {
        self.assets
            .get(path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| LayoutError::NotFound(path.to_string()))
    }
}

/// Serves assets over HTTP: `GET {base_url}/{path}`.
#[derive(Clone, Debug)]
pub struct HttpAssetSource {
    base_url: String,
    http: reqwest::Client,
}

impl HttpAssetSource {
    /// Source rooted at `base_url` with a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Source rooted at `base_url` sharing an existing client.
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let raw = base_url.into();
        Self {
            base_url: raw.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an asset path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, path: &str) -> LayoutResult<Vec<u8>> {
        let url = self.url(path);
        debug!(url = %url, "fetching asset");
        let resp = self.http.get(&url).send().await?;

        match resp.status().as_u16() {
            200..=299 => Ok(resp.bytes().await?.to_vec()),
            404 => Err(LayoutError::NotFound(path.to_string())),
            status => Err(LayoutError::Fetch { url, status }),
        }
    }
}
