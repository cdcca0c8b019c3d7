use serde::{Deserialize, Serialize};

/// A named pointer to a commit in the upstream repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub sha: String, // Head commit sha
}

/// Client intent to create branch `ref` at commit `sha`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBranchRequest {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

/// `{"detail": ...}` body used for acknowledgements and errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
