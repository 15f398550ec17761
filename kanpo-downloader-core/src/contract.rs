//! # contract: shared types and the tree-listing interface
//!
//! This module defines the wire shape of a repository tree listing, the error
//! type for fetching one, and the [`TreeSource`] trait implemented by the HTTP
//! collaborators in [`crate::download`] and by mocks in tests.
//!
//! ## Interface & Extensibility
//! - Implement [`TreeSource`] to add a new listing endpoint.
//! - Chain several sources with [`crate::download::FallbackTreeSource`].
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so consumers get a `MockTreeSource`
//!   when the `test-export-mocks` feature is enabled (default).

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of node in a repository tree listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A file.
    Blob,
    /// A directory.
    Tree,
    #[serde(other)]
    Other,
}

/// One object of a remote tree listing; `path` is `"<date>/<filename>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Absent for directories.
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

impl TreeNode {
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::Blob
    }
}

/// Body returned by both the cache proxy and the GitHub trees API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeListing {
    pub tree: Vec<TreeNode>,
}

/// Errors raised while fetching a tree listing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("HTTP error from {endpoint}: status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    #[error("malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
    #[error("all listing endpoints failed: {}", summarize(.0))]
    Exhausted(Vec<FetchError>),
    #[error("no listing endpoints configured")]
    NoEndpoints,
}

fn summarize(errors: &[FetchError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Source of a year's repository tree listing.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Fetch the full recursive tree listing for `year`.
    async fn fetch_tree(&self, year: i32) -> Result<TreeListing, FetchError>;

    /// Short human-readable name of the endpoint, used in logs.
    fn describe(&self) -> String;
}
