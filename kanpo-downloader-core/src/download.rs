//! Tree-listing collaborators: the cache proxy, the GitHub trees API, and an
//! ordered fallback chain over them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::config::{ListingConfig, RepoLocation};
use crate::contract::{FetchError, TreeListing, TreeSource};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = concat!("kanpo-downloader/", env!("CARGO_PKG_VERSION"));

/// Which listing endpoint an [`HttpTreeSource`] talks to.
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// `GET <url>?year=<Y>`
    Cache { url: String },
    /// `GET <api_base>/repos/<org>/<prefix><Y>/git/trees/<branch>?recursive=1`
    GitHubApi {
        api_base: String,
        repo: RepoLocation,
    },
}

/// Builds the shared HTTP client with a per-request timeout.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(CLIENT_USER_AGENT)
        .build()
        .map_err(|e| FetchError::Transport {
            endpoint: "client".to_string(),
            message: e.to_string(),
        })
}

pub struct HttpTreeSource {
    client: Client,
    endpoint: Endpoint,
}

impl HttpTreeSource {
    pub fn new(client: Client, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    fn request(&self, year: i32) -> reqwest::RequestBuilder {
        match &self.endpoint {
            Endpoint::Cache { url } => self.client.get(url).query(&[("year", year)]),
            Endpoint::GitHubApi { api_base, repo } => self
                .client
                .get(repo.tree_api_url(api_base, year))
                .header(ACCEPT, GITHUB_ACCEPT),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                endpoint: self.describe(),
            }
        } else {
            FetchError::Transport {
                endpoint: self.describe(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl TreeSource for HttpTreeSource {
    async fn fetch_tree(&self, year: i32) -> Result<TreeListing, FetchError> {
        let endpoint = self.describe();
        info!(endpoint = %endpoint, year, "Fetching tree listing");

        let resp = self
            .request(year)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            error!(endpoint = %endpoint, status = %status, year, "Listing endpoint returned error");
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let listing: TreeListing =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        info!(endpoint = %endpoint, year, entries = listing.tree.len(), "Fetched tree listing");
        Ok(listing)
    }

    fn describe(&self) -> String {
        match &self.endpoint {
            Endpoint::Cache { url } => format!("cache({url})"),
            Endpoint::GitHubApi { api_base, .. } => format!("github-api({api_base})"),
        }
    }
}

/// Tries each source in order; the first success wins.
pub struct FallbackTreeSource {
    attempts: Vec<Box<dyn TreeSource>>,
}

impl FallbackTreeSource {
    pub fn new(attempts: Vec<Box<dyn TreeSource>>) -> Self {
        Self { attempts }
    }

    /// Cache proxy first, GitHub API second.
    pub fn from_config(config: &ListingConfig) -> Result<Self, FetchError> {
        let client = build_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(vec![
            Box::new(HttpTreeSource::new(
                client.clone(),
                Endpoint::Cache {
                    url: config.cache_url.clone(),
                },
            )),
            Box::new(HttpTreeSource::new(
                client,
                Endpoint::GitHubApi {
                    api_base: config.github_api_base.clone(),
                    repo: config.repo(),
                },
            )),
        ]))
    }
}

#[async_trait]
impl TreeSource for FallbackTreeSource {
    async fn fetch_tree(&self, year: i32) -> Result<TreeListing, FetchError> {
        if self.attempts.is_empty() {
            return Err(FetchError::NoEndpoints);
        }

        let mut failures = Vec::with_capacity(self.attempts.len());
        for (i, source) in self.attempts.iter().enumerate() {
            match source.fetch_tree(year).await {
                Ok(listing) => {
                    if i > 0 {
                        info!(endpoint = %source.describe(), year, "Fallback endpoint succeeded");
                    }
                    return Ok(listing);
                }
                Err(e) => {
                    warn!(endpoint = %source.describe(), year, error = %e, "Listing attempt failed");
                    failures.push(e);
                }
            }
        }

        error!(year, attempts = failures.len(), "All listing endpoints failed");
        Err(FetchError::Exhausted(failures))
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.attempts.iter().map(|s| s.describe()).collect();
        format!("fallback[{}]", names.join(" -> "))
    }
}
