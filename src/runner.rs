use crate::config::Config;
use crate::types::{LookupError, OcpVersion, VersionRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

/// Remote lookups for a single location.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Supported OCP versions, in payload order.
    async fn ocp_versions(&self, location: &str) -> Result<Vec<String>, LookupError>;

    /// Deployed RP version; the response body verbatim.
    ///
    /// The HTTP source decodes the body as UTF-8 (or the charset the response
    /// declares); invalid sequences become U+FFFD.
    async fn rp_version(&self, location: &str) -> Result<String, LookupError>;
}

pub struct HttpVersionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVersionSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("aro-rp-versions/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, LookupError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }
        Ok(response)
    }
}

#[async_trait]
impl VersionSource for HttpVersionSource {
    async fn ocp_versions(&self, location: &str) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/ocpversions/{}", self.base_url, location);
        let body = self.get(&url).await?.bytes().await?;
        let versions: Vec<OcpVersion> = serde_json::from_slice(&body)?;
        Ok(versions.into_iter().map(|v| v.version).collect())
    }

    async fn rp_version(&self, location: &str) -> Result<String, LookupError> {
        let url = format!("{}/rpversion/{}", self.base_url, location);
        let body = self.get(&url).await?.text().await?;
        Ok(body)
    }
}

/// Runs both lookups for `location`. Never fails: a failed lookup is logged
/// and leaves its field empty.
pub async fn fetch_location<S>(source: &S, location: &str) -> VersionRecord
where
    S: VersionSource + ?Sized,
{
    debug!("processing location: {}", location);

    let (ocp, rp) = tokio::join!(source.ocp_versions(location), source.rp_version(location));

    let ocp_versions = ocp.unwrap_or_else(|e| {
        debug!("failed to get OCP versions for {:?} location: {}", location, e);
        Vec::new()
    });
    let rp_version = rp.unwrap_or_else(|e| {
        debug!("failed to get RP version for {:?} location: {}", location, e);
        String::new()
    });

    VersionRecord {
        location: location.to_string(),
        rp_version,
        ocp_versions,
    }
}

/// Stable ascending sort by location name.
pub fn order_by_location(mut records: Vec<VersionRecord>) -> Vec<VersionRecord> {
    records.sort_by(|a, b| a.location.cmp(&b.location));
    records
}

pub struct VersionChecker<S> {
    source: Arc<S>,
    show_progress: bool,
}

impl<S: VersionSource + 'static> VersionChecker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Fetches every location and returns the records ordered by location.
    pub async fn check_all(&self, locations: &[String]) -> Vec<VersionRecord> {
        order_by_location(self.fetch_all(locations).await)
    }

    /// Fetches every location concurrently, one task per entry.
    ///
    /// Returns once all tasks have finished, with exactly one record per
    /// entry in completion order.
    pub async fn fetch_all(&self, locations: &[String]) -> Vec<VersionRecord> {
        let progress = self.progress_bar(locations.len());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handles: Vec<(String, JoinHandle<()>)> = locations
            .iter()
            .map(|location| {
                let source = Arc::clone(&self.source);
                let tx = tx.clone();
                let task_location = location.clone();

                let handle = tokio::spawn(async move {
                    let record = fetch_location(source.as_ref(), &task_location).await;
                    // The receiver is alive until every sender is dropped.
                    let _ = tx.send(record);
                });
                (location.clone(), handle)
            })
            .collect();
        drop(tx);

        let mut records = Vec::with_capacity(locations.len());
        while let Some(record) = rx.recv().await {
            records.push(record);
            progress.inc(1);
        }

        // A task that panicked never sent; fill its slot so no location is lost.
        let (names, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        for (location, result) in names.into_iter().zip(join_all(handles).await) {
            if let Err(e) = result {
                warn!("task for {:?} location failed: {}", location, e);
                records.push(VersionRecord::empty(location));
                progress.inc(1);
            }
        }

        progress.finish_and_clear();
        records
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} locations ({eta})")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }
}
