use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use serde::de::DeserializeOwned;

use crate::model::{FirmwareCatalog, Repository, RepositorySearch};
use crate::snapshot::SnapshotCache;

pub const FIRMWARE_CATALOG_URL: &str = "https://ios.cfw.guide/main.json";
pub const REPOSITORY_SEARCH_URL: &str =
    "https://api.canister.me/v1/community/repositories/search?query=";

/// How long a fetched catalog is served before it is fetched again.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(3600);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only access to the external firmware and repository catalogs.
#[derive(Clone, Debug)]
pub struct CatalogService {
    inner: Arc<CatalogInner>,
}

#[derive(Debug)]
struct CatalogInner {
    http: reqwest::Client,
    firmware: SnapshotCache<FirmwareCatalog>,
    repositories: SnapshotCache<Vec<Repository>>,
}

impl CatalogService {
    pub fn new(ttl: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("bloo/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build catalog http client")?;

        Ok(Self {
            inner: Arc::new(CatalogInner {
                http,
                firmware: SnapshotCache::new(ttl),
                repositories: SnapshotCache::new(ttl),
            }),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.inner.firmware.ttl()
    }

    /// Firmware, jailbreak and device data. `None` when the catalog has never
    /// been fetched successfully.
    pub async fn firmware(&self) -> Option<Arc<FirmwareCatalog>> {
        let http = &self.inner.http;
        self.inner
            .firmware
            .get_or_refresh("firmware", || fetch_json(http, FIRMWARE_CATALOG_URL))
            .await
    }

    pub async fn repositories(&self) -> Option<Arc<Vec<Repository>>> {
        let http = &self.inner.http;
        self.inner
            .repositories
            .get_or_refresh("repositories", || async move {
                let search: RepositorySearch = fetch_json(http, REPOSITORY_SEARCH_URL).await?;
                search
                    .data
                    .context("repository search response carried no data")
            })
            .await
    }

    pub async fn invalidate(&self) {
        self.inner.firmware.invalidate().await;
        self.inner.repositories.invalidate().await;
    }
}

async fn fetch_json<T>(http: &reqwest::Client, url: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let response = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned an error status"))?;

    let body = response
        .bytes()
        .await
        .with_context(|| format!("failed to read body of {url}"))?;

    serde_json::from_slice(&body).with_context(|| format!("failed to decode catalog from {url}"))
}
