// Branch Handler
//
// Each operation builds one authenticated upstream client, performs its upstream
// work, and maps any upstream failure to the operation's fixed local error kind.
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Json, Path, State},
};
use serde::Deserialize;

use crate::models::{Branch, CreateBranchRequest, Detail};
use crate::proxy::error::{ApiError, ApiResult};
use crate::proxy::server::AppState;
use crate::proxy::upstream::{GitHubApi, UpstreamBranch, UpstreamResult, HEADS_PREFIX};

#[derive(Debug, Deserialize)]
pub struct RepoPath {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Deserialize)]
pub struct BranchPath {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

#[derive(Debug, Deserialize)]
pub struct RefPath {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
}

impl From<UpstreamBranch> for Branch {
    fn from(branch: UpstreamBranch) -> Self {
        Branch {
            name: branch.name,
            sha: branch.commit.sha,
        }
    }
}

/// GET /repos/{owner}/{repo}/branches
pub async fn list_branches(
    State(state): State<AppState>,
    path: Result<Path<RepoPath>, PathRejection>,
) -> ApiResult<Json<Vec<Branch>>> {
    let Path(path) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let github = state.github()?;
    tracing::info!("Listing branches of {}/{}", path.owner, path.repo);

    let branches = fetch_branches(github.as_ref(), &path.owner, &path.repo)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(Json(branches))
}

/// GET /repos/{owner}/{repo}/branches/{branch}
pub async fn get_branch(
    State(state): State<AppState>,
    path: Result<Path<BranchPath>, PathRejection>,
) -> ApiResult<Json<Branch>> {
    let Path(path) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let github = state.github()?;
    tracing::info!(
        "Fetching branch {} of {}/{}",
        path.branch,
        path.owner,
        path.repo
    );

    let branch = fetch_branch(github.as_ref(), &path.owner, &path.repo, &path.branch)
        .await
        .map_err(ApiError::NotFound)?;

    Ok(Json(branch))
}

/// POST /repos/{owner}/{repo}/git/refs
pub async fn create_branch(
    State(state): State<AppState>,
    path: Result<Path<RepoPath>, PathRejection>,
    payload: Result<Json<CreateBranchRequest>, JsonRejection>,
) -> ApiResult<Json<Detail>> {
    let Path(path) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let github = state.github()?;
    let Json(payload) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let ref_name = format!("{}{}", HEADS_PREFIX, payload.ref_name);
    tracing::info!(
        "Creating {} at {} in {}/{}",
        ref_name,
        payload.sha,
        path.owner,
        path.repo
    );

    create_reference(
        github.as_ref(),
        &path.owner,
        &path.repo,
        &ref_name,
        &payload.sha,
    )
    .await
    .map_err(ApiError::Validation)?;

    Ok(Json(Detail::new("Branch created successfully.")))
}

/// DELETE /repos/{owner}/{repo}/git/refs/heads/{ref}
pub async fn delete_branch(
    State(state): State<AppState>,
    path: Result<Path<RefPath>, PathRejection>,
) -> ApiResult<Json<Detail>> {
    let Path(path) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let github = state.github()?;
    tracing::info!(
        "Deleting branch {} of {}/{}",
        path.ref_name,
        path.owner,
        path.repo
    );

    delete_reference(github.as_ref(), &path.owner, &path.repo, &path.ref_name)
        .await
        .map_err(ApiError::NotFound)?;

    Ok(Json(Detail::new("Branch deleted successfully.")))
}

async fn fetch_branches(
    github: &dyn GitHubApi,
    owner: &str,
    repo: &str,
) -> UpstreamResult<Vec<Branch>> {
    let repository = github.get_repository(owner, repo).await?;
    let branches = github.list_branches(&repository).await?;
    Ok(branches.into_iter().map(Branch::from).collect())
}

async fn fetch_branch(
    github: &dyn GitHubApi,
    owner: &str,
    repo: &str,
    branch: &str,
) -> UpstreamResult<Branch> {
    let repository = github.get_repository(owner, repo).await?;
    let branch = github.get_branch(&repository, branch).await?;
    Ok(branch.into())
}

async fn create_reference(
    github: &dyn GitHubApi,
    owner: &str,
    repo: &str,
    ref_name: &str,
    sha: &str,
) -> UpstreamResult<()> {
    let repository = github.get_repository(owner, repo).await?;
    let reference = github.create_reference(&repository, ref_name, sha).await?;
    tracing::debug!("Created {} -> {}", reference.ref_name, reference.object.sha);
    Ok(())
}

async fn delete_reference(
    github: &dyn GitHubApi,
    owner: &str,
    repo: &str,
    branch: &str,
) -> UpstreamResult<()> {
    let repository = github.get_repository(owner, repo).await?;
    let reference = github
        .get_reference(&repository, &format!("heads/{}", branch))
        .await?;
    github.delete_reference(&repository, &reference).await
}
