// Upstream module - GitHub REST API capability set

pub mod client;
pub mod pagination;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::proxy::config::AccessToken;

pub use client::{GitHubClient, GitHubConnector};

/// Namespace for branch heads in the reference store
pub const HEADS_PREFIX: &str = "refs/heads/";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("{status} {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: RepositoryOwner,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl Repository {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
            owner: RepositoryOwner {
                login: owner.to_string(),
            },
            default_branch: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPointer {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamBranch {
    pub name: String,
    pub commit: CommitPointer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitReference {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub object: GitObject,
}

/// Upstream operations needed by the branch proxy.
///
/// One instance is authenticated with a single credential and lives for one request.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn get_repository(&self, owner: &str, repo: &str) -> UpstreamResult<Repository>;

    /// All branches, in upstream order, across every page
    async fn list_branches(&self, repository: &Repository) -> UpstreamResult<Vec<UpstreamBranch>>;

    async fn get_branch(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> UpstreamResult<UpstreamBranch>;

    /// `ref_name` is fully qualified, e.g. `refs/heads/feature-x`
    async fn create_reference(
        &self,
        repository: &Repository,
        ref_name: &str,
        sha: &str,
    ) -> UpstreamResult<GitReference>;

    /// `ref_name` is relative to `refs/`, e.g. `heads/feature-x`
    async fn get_reference(
        &self,
        repository: &Repository,
        ref_name: &str,
    ) -> UpstreamResult<GitReference>;

    async fn delete_reference(
        &self,
        repository: &Repository,
        reference: &GitReference,
    ) -> UpstreamResult<()>;
}

/// Builds an authenticated upstream client per request
pub trait UpstreamConnector: Send + Sync {
    fn connect(&self, token: &AccessToken) -> UpstreamResult<Arc<dyn GitHubApi>>;
}
