//! OpenAPI document and health check endpoints

use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

pub const API_TITLE: &str = "GitHub API Proxy - Repository Branch Management";
pub const API_VERSION: &str = "1.0.0";

/// Health check handler
pub async fn health_check() -> Response {
    Json(json!({
        "status": "ok"
    }))
    .into_response()
}

/// GET /openapi.json
pub async fn openapi_spec() -> Json<Value> {
    Json(openapi_document())
}

fn path_param(name: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    })
}

fn detail_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Detail" }
            }
        }
    })
}

pub fn openapi_document() -> Value {
    let tags = json!(["Branch Management"]);
    let owner_repo = [path_param("owner"), path_param("repo")];

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": API_TITLE,
            "description": "Proxy API for managing GitHub repository branches via Git Data API.",
            "version": API_VERSION,
            "contact": {
                "name": "Support",
                "email": "support@pm.fountain.coach"
            }
        },
        "servers": [
            {
                "url": "https://branches.pm.fountain.coach",
                "description": "Proxy server for GitHub repository branches."
            }
        ],
        "paths": {
            "/repos/{owner}/{repo}/branches": {
                "get": {
                    "tags": tags,
                    "summary": "List Branches",
                    "description": "Retrieves a list of branches in the specified repository.",
                    "operationId": "listBranches",
                    "parameters": owner_repo,
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Branch" }
                                    }
                                }
                            }
                        },
                        "500": detail_response("Error retrieving branches")
                    }
                }
            },
            "/repos/{owner}/{repo}/branches/{branch}": {
                "get": {
                    "tags": tags,
                    "summary": "Get Branch Details",
                    "description": "Retrieves details of a specific branch.",
                    "operationId": "getBranch",
                    "parameters": [owner_repo[0], owner_repo[1], path_param("branch")],
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Branch" }
                                }
                            }
                        },
                        "404": detail_response("Branch not found")
                    }
                }
            },
            "/repos/{owner}/{repo}/git/refs": {
                "post": {
                    "tags": tags,
                    "summary": "Create Branch (via refs)",
                    "description": "Creates a new branch in the specified repository using refs.",
                    "operationId": "createBranch",
                    "parameters": owner_repo,
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBranchRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": detail_response("Branch created"),
                        "422": detail_response("Error creating branch")
                    }
                }
            },
            "/repos/{owner}/{repo}/git/refs/heads/{ref}": {
                "delete": {
                    "tags": tags,
                    "summary": "Delete Branch (via refs)",
                    "description": "Deletes a specific branch reference.",
                    "operationId": "deleteBranch",
                    "parameters": [owner_repo[0], owner_repo[1], path_param("ref")],
                    "responses": {
                        "200": detail_response("Branch deleted"),
                        "404": detail_response("Branch not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Branch": {
                    "title": "Branch",
                    "type": "object",
                    "required": ["name", "sha"],
                    "properties": {
                        "name": { "title": "Name", "type": "string" },
                        "sha": { "title": "Sha", "type": "string" }
                    }
                },
                "CreateBranchRequest": {
                    "title": "CreateBranchRequest",
                    "type": "object",
                    "required": ["ref", "sha"],
                    "properties": {
                        "ref": { "title": "Ref", "type": "string" },
                        "sha": { "title": "Sha", "type": "string" }
                    }
                },
                "Detail": {
                    "title": "Detail",
                    "type": "object",
                    "required": ["detail"],
                    "properties": {
                        "detail": { "title": "Detail", "type": "string" }
                    }
                }
            }
        }
    })
}
