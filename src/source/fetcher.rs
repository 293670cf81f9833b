//! Page retrieval over HTTP.
//!
//! Each page gets exactly one attempt. Any failure aborts the whole run,
//! so nothing downstream ever sees a partial page set.

use super::PageSource;
use crate::config::SourceConfig;
use crate::error::{PipelineError, PipelineResult};
use anyhow::{Context, Result};
use futures::{stream, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

/// Raw markup of a fetched page together with where it came from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub source: PageSource,
    pub markup: String,
}

/// HTTP fetcher for launch list pages.
pub struct Fetcher {
    http_client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher using the configured timeout and User-Agent.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http_client })
    }

    /// Fetch a single URL and return its body.
    pub async fn fetch(&self, url: &str) -> PipelineResult<String> {
        let network = |source| PipelineError::Network {
            url: url.to_string(),
            source,
        };

        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?;

        let body = response.text().await.map_err(network)?;
        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body)
    }

    /// Fetch every page in order, one request at a time.
    ///
    /// Stops at the first failure.
    pub async fn fetch_all(
        &self,
        pages: &[PageSource],
        show_progress: bool,
    ) -> PipelineResult<Vec<FetchedPage>> {
        let progress = if show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{pos}/{len}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_length(pages.len() as u64);
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };

        let pb = &progress;
        let fetched = stream::iter(pages)
            .then(move |page| async move {
                pb.set_message(page.url.clone());
                let markup = self.fetch(&page.url).await?;
                pb.inc(1);
                Ok::<_, PipelineError>(FetchedPage {
                    source: page.clone(),
                    markup,
                })
            })
            .try_collect::<Vec<_>>()
            .await;

        match &fetched {
            Ok(pages) => progress.finish_with_message(format!("Fetched {} pages", pages.len())),
            Err(_) => progress.abandon(),
        }

        let pages = fetched?;
        info!("Fetched {} pages", pages.len());
        Ok(pages)
    }
}
