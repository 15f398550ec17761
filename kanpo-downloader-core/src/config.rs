use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_CACHE_URL: &str = "https://kanpo-ghapi-cache.m9m9.workers.dev/";
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_ORG: &str = "kanpo-downloader";
pub const DEFAULT_REPO_PREFIX: &str = "kanpo-";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Earliest year with a published repository.
pub const FIRST_YEAR: i32 = 2025;

/// Where listings are fetched from and how download links are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub cache_url: String,
    pub github_api_base: String,
    pub raw_base: String,
    pub org: String,
    pub repo_prefix: String,
    pub branch: String,
    pub timeout_secs: u64,
    pub first_year: i32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            cache_url: DEFAULT_CACHE_URL.to_string(),
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
            org: DEFAULT_ORG.to_string(),
            repo_prefix: DEFAULT_REPO_PREFIX.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            first_year: FIRST_YEAR,
        }
    }
}

impl ListingConfig {
    pub fn repo(&self) -> RepoLocation {
        RepoLocation {
            raw_base: self.raw_base.clone(),
            org: self.org.clone(),
            repo_prefix: self.repo_prefix.clone(),
            branch: self.branch.clone(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            cache_url = %self.cache_url,
            github_api_base = %self.github_api_base,
            org = %self.org,
            timeout_secs = self.timeout_secs,
            "Loaded ListingConfig"
        );
        debug!(?self, "ListingConfig loaded (full debug)");
    }
}

/// Per-year repository naming: `<org>/<repo_prefix><year>` on `branch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub raw_base: String,
    pub org: String,
    pub repo_prefix: String,
    pub branch: String,
}

impl Default for RepoLocation {
    fn default() -> Self {
        ListingConfig::default().repo()
    }
}

impl RepoLocation {
    pub fn repo_name(&self, year: i32) -> String {
        format!("{}{}", self.repo_prefix, year)
    }

    /// Direct download link for a file in the year's repository.
    pub fn raw_url(&self, year: i32, path: &str) -> String {
        format!(
            "{}/{}/{}/refs/heads/{}/{}",
            self.raw_base.trim_end_matches('/'),
            self.org,
            self.repo_name(year),
            self.branch,
            path
        )
    }

    /// GitHub trees API endpoint for the year's repository.
    pub fn tree_api_url(&self, api_base: &str, year: i32) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            api_base.trim_end_matches('/'),
            self.org,
            self.repo_name(year),
            self.branch
        )
    }
}
