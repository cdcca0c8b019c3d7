// Upstream client implementation
// GitHub REST API over a shared reqwest connection pool

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

use super::pagination::next_page_url;
use super::{
    GitHubApi, GitReference, Repository, UpstreamBranch, UpstreamConnector, UpstreamError,
    UpstreamResult,
};
use crate::error::{AppError, AppResult};
use crate::proxy::config::{AccessToken, ProxyConfig};

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: &str = "100";

/// Production connector: one pooled HTTP client, one `GitHubClient` per credential
pub struct GitHubConnector {
    http_client: Client,
    base_url: Url,
}

impl GitHubConnector {
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.github.api_base_url).map_err(|e| {
            AppError::Config(format!(
                "Invalid GitHub API URL {}: {}",
                config.github.api_base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "GitHub API URL cannot be used as a base: {}",
                base_url
            )));
        }

        let http_client = crate::utils::http::create_client_with_proxy(
            config.request_timeout,
            Some(&config.upstream_proxy),
        )?;

        Ok(Self {
            http_client,
            base_url,
        })
    }
}

impl UpstreamConnector for GitHubConnector {
    fn connect(&self, token: &AccessToken) -> UpstreamResult<Arc<dyn GitHubApi>> {
        let client = GitHubClient::new(self.http_client.clone(), self.base_url.clone(), token)?;
        Ok(Arc::new(client))
    }
}

pub struct GitHubClient {
    http_client: Client,
    base_url: Url,
    headers: header::HeaderMap,
}

impl GitHubClient {
    pub fn new(http_client: Client, base_url: Url, token: &AccessToken) -> UpstreamResult<Self> {
        let mut authorization =
            header::HeaderValue::from_str(&format!("Bearer {}", token.expose()))
                .map_err(|e| UpstreamError::InvalidCredential(e.to_string()))?;
        authorization.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
        headers.insert(
            API_VERSION_HEADER,
            header::HeaderValue::from_static(API_VERSION),
        );

        Ok(Self {
            http_client,
            base_url,
            headers,
        })
    }

    /// Append path segments to the API base, percent-encoding each one
    fn build_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// `{base}/repos/{owner}/{repo}/{tail...}`
    fn repo_url<'a>(
        &self,
        repository: &'a Repository,
        tail: impl IntoIterator<Item = &'a str>,
    ) -> UpstreamResult<Url> {
        let segments = std::iter::once("repos")
            .chain(repository.full_name.split('/'))
            .chain(tail);
        self.build_url(segments)
    }

    /// Send a request; non-2xx statuses become `UpstreamError::Status`
    async fn send(&self, request: RequestBuilder) -> UpstreamResult<Response> {
        let response = request
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(UpstreamError::Status {
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason()),
        })
    }

    /// Validate a `rel="next"` target. The credential is only ever sent to the API
    /// origin, and a page already fetched ends the walk with an error.
    fn follow_link(&self, link: &str, visited: &HashSet<Url>) -> UpstreamResult<Url> {
        let url = Url::parse(link).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
        if url.origin() != self.base_url.origin() {
            return Err(UpstreamError::InvalidUrl(format!(
                "Pagination link leaves API origin: {}",
                url
            )));
        }
        if visited.contains(&url) {
            return Err(UpstreamError::InvalidUrl(format!(
                "Pagination link repeats: {}",
                url
            )));
        }
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> UpstreamResult<T> {
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> UpstreamResult<T> {
        tracing::debug!("GitHub GET {}", url);
        let response = self.send(self.http_client.get(url)).await?;
        Self::decode(response).await
    }
}

/// Prefer the `message` field of a GitHub error document, fall back to the raw body
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("Unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_repository(&self, owner: &str, repo: &str) -> UpstreamResult<Repository> {
        let url = self.build_url(["repos", owner, repo])?;
        self.get_json(url).await
    }

    async fn list_branches(&self, repository: &Repository) -> UpstreamResult<Vec<UpstreamBranch>> {
        let mut url = self.repo_url(repository, ["branches"])?;
        url.query_pairs_mut().append_pair("per_page", PAGE_SIZE);

        let mut branches = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(url);
        while let Some(page_url) = next.take() {
            visited.insert(page_url.clone());
            tracing::debug!("GitHub GET {}", page_url);
            let response = self.send(self.http_client.get(page_url)).await?;
            next = match next_page_url(response.headers()) {
                Some(link) => Some(self.follow_link(&link, &visited)?),
                None => None,
            };
            let page: Vec<UpstreamBranch> = Self::decode(response).await?;
            branches.extend(page);
        }

        Ok(branches)
    }

    async fn get_branch(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> UpstreamResult<UpstreamBranch> {
        let url = self.repo_url(repository, ["branches", branch])?;
        self.get_json(url).await
    }

    async fn create_reference(
        &self,
        repository: &Repository,
        ref_name: &str,
        sha: &str,
    ) -> UpstreamResult<GitReference> {
        let url = self.repo_url(repository, ["git", "refs"])?;
        tracing::debug!("GitHub POST {} ({} -> {})", url, ref_name, sha);

        let body = serde_json::json!({ "ref": ref_name, "sha": sha });
        let response = self.send(self.http_client.post(url).json(&body)).await?;
        Self::decode(response).await
    }

    async fn get_reference(
        &self,
        repository: &Repository,
        ref_name: &str,
    ) -> UpstreamResult<GitReference> {
        let tail = ["git", "ref"].into_iter().chain(ref_name.split('/'));
        let url = self.repo_url(repository, tail)?;
        self.get_json(url).await
    }

    async fn delete_reference(
        &self,
        repository: &Repository,
        reference: &GitReference,
    ) -> UpstreamResult<()> {
        // "refs/heads/x" -> git/refs/heads/x
        let tail = std::iter::once("git").chain(reference.ref_name.split('/'));
        let url = self.repo_url(repository, tail)?;
        tracing::debug!("GitHub DELETE {}", url);

        self.send(self.http_client.delete(url)).await?;
        Ok(())
    }
}
