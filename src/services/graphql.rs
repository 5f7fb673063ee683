//! GraphQL merge-request listing.
//!
//! The REST list endpoint omits nested assignee/reviewer/approval data, so
//! the MR list panel goes through `/api/graphql` instead. The response is
//! translated into the exact field layout of [`MergeRequest`] by one explicit
//! mapping pass before deserialization, so the REST and GraphQL paths share
//! a single model.

use crate::error::AppError;
use crate::models::MergeRequest;
use crate::services::gitlab_client::GitLabClient;
use serde_json::{json, Map, Value};

/// Listing query. Nested collections come back as `{"nodes": [...]}`
/// wrappers which the translation pass flattens.
const MERGE_REQUEST_LIST_QUERY: &str = r#"
query($fullPath: ID!, $state: MergeRequestState, $first: Int) {
  project(fullPath: $fullPath) {
    mergeRequests(state: $state, first: $first, sort: UPDATED_DESC) {
      nodes {
        id
        iid
        title
        description
        state
        sourceBranch
        targetBranch
        webUrl
        createdAt
        updatedAt
        labels { nodes { title } }
        author { id username name webUrl }
        assignees { nodes { id username name webUrl } }
        reviewers { nodes { id username name webUrl } }
        approvedBy { nodes { id username name webUrl } }
      }
    }
  }
}
"#;

/// camelCase GraphQL field -> snake_case REST field.
///
/// Every renamed field the query selects must appear here; a missing entry
/// silently drops the field during deserialization.
const FIELD_RENAMES: &[(&str, &str)] = &[
    ("sourceBranch", "source_branch"),
    ("targetBranch", "target_branch"),
    ("webUrl", "web_url"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("avatarUrl", "avatar_url"),
    ("approvedBy", "approved_by"),
];

fn rename_field(key: &str) -> &str {
    FIELD_RENAMES
        .iter()
        .find(|(gql, _)| *gql == key)
        .map(|(_, rest)| *rest)
        .unwrap_or(key)
}

/// Extract the numeric tail of a global ID (`gid://gitlab/MergeRequest/42`).
fn gid_to_id(value: &Value) -> Value {
    match value.as_str() {
        Some(s) => match s.rsplit('/').next().and_then(|tail| tail.parse::<i64>().ok()) {
            Some(n) => json!(n),
            None => value.clone(),
        },
        None => value.clone(),
    }
}

/// Translate one GraphQL merge request object into the REST field layout.
///
/// Pure and total over well-formed input: renames fields per
/// [`FIELD_RENAMES`], flattens `{"nodes": [...]}` wrappers, converts global
/// IDs and string IIDs to numbers, and collapses label objects to their
/// titles.
pub fn translate_merge_request(value: &Value) -> Value {
    translate_object(value)
}

fn translate_object(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };

    let mut out = Map::new();
    for (key, val) in obj {
        let translated = match key.as_str() {
            "id" => gid_to_id(val),
            "iid" => match val.as_str().and_then(|s| s.parse::<i64>().ok()) {
                Some(n) => json!(n),
                None => val.clone(),
            },
            "labels" => {
                // label nodes carry a title; the REST shape is a bare string list
                let titles: Vec<Value> = flatten_nodes(val)
                    .iter()
                    .filter_map(|l| l.get("title").cloned())
                    .collect();
                Value::Array(titles)
            }
            _ => match val {
                Value::Object(inner) if inner.contains_key("nodes") => Value::Array(
                    flatten_nodes(val)
                        .iter()
                        .map(translate_object)
                        .collect(),
                ),
                Value::Object(_) => translate_object(val),
                other => other.clone(),
            },
        };
        out.insert(rename_field(key).to_string(), translated);
    }
    Value::Object(out)
}

fn flatten_nodes(value: &Value) -> Vec<Value> {
    value
        .get("nodes")
        .and_then(|n| n.as_array())
        .cloned()
        .unwrap_or_default()
}

/// List a project's merge requests with nested associations.
///
/// `state` is the GraphQL enum spelling (`opened`, `merged`, `closed`) or
/// `None` for all states. `first` bounds the number of results.
pub async fn list_merge_requests(
    client: &GitLabClient,
    project_path: &str,
    state: Option<&str>,
    first: u32,
) -> Result<Vec<MergeRequest>, AppError> {
    let variables = json!({
        "fullPath": project_path,
        "state": state,
        "first": first,
    });
    let body = json!({
        "query": MERGE_REQUEST_LIST_QUERY,
        "variables": variables,
    });

    let response = client
        .http()
        .post(client.graphql_url())
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::request_failed(
            "GraphQL request failed",
            status.as_u16(),
            "/api/graphql",
        ));
    }

    let payload: Value = response.json().await?;

    if let Some(errors) = payload.get("errors").and_then(|e| e.as_array()) {
        if !errors.is_empty() {
            let message = errors[0]
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("GraphQL error");
            return Err(AppError::request_failed(message, status.as_u16(), "/api/graphql"));
        }
    }

    let nodes = payload
        .pointer("/data/project/mergeRequests/nodes")
        .and_then(|n| n.as_array())
        .ok_or_else(|| AppError::response_shape("GraphQL response missing mergeRequests.nodes"))?;

    nodes
        .iter()
        .map(|node| {
            serde_json::from_value::<MergeRequest>(translate_merge_request(node))
                .map_err(|e| AppError::response_shape(format!("merge request node: {}", e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gql_node() -> Value {
        json!({
            "id": "gid://gitlab/MergeRequest/500",
            "iid": "7",
            "title": "Add feature",
            "description": "body",
            "state": "opened",
            "sourceBranch": "feature",
            "targetBranch": "main",
            "webUrl": "https://gitlab.com/g/p/-/merge_requests/7",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z",
            "labels": {"nodes": [{"title": "backend"}, {"title": "urgent"}]},
            "author": {"id": "gid://gitlab/User/1", "username": "ann", "name": "Ann", "webUrl": null},
            "assignees": {"nodes": [{"id": "gid://gitlab/User/2", "username": "bob", "name": "Bob", "webUrl": null}]},
            "reviewers": {"nodes": []},
            "approvedBy": {"nodes": []}
        })
    }

    #[test]
    fn test_field_renames() {
        let out = translate_merge_request(&gql_node());
        assert_eq!(out["source_branch"], "feature");
        assert_eq!(out["target_branch"], "main");
        assert_eq!(out["web_url"], "https://gitlab.com/g/p/-/merge_requests/7");
        assert!(out.get("sourceBranch").is_none());
    }

    #[test]
    fn test_gid_and_iid_become_numbers() {
        let out = translate_merge_request(&gql_node());
        assert_eq!(out["id"], 500);
        assert_eq!(out["iid"], 7);
        assert_eq!(out["author"]["id"], 1);
    }

    #[test]
    fn test_nodes_wrappers_flatten() {
        let out = translate_merge_request(&gql_node());
        assert_eq!(out["labels"], json!(["backend", "urgent"]));
        assert_eq!(out["assignees"][0]["username"], "bob");
        assert_eq!(out["reviewers"], json!([]));
    }

    #[test]
    fn test_translated_node_deserializes_to_model() {
        let out = translate_merge_request(&gql_node());
        let mr: MergeRequest = serde_json::from_value(out).unwrap();
        assert_eq!(mr.iid, 7);
        assert_eq!(mr.labels, vec!["backend".to_string(), "urgent".to_string()]);
        assert_eq!(mr.assignees[0].name, "Bob");
        assert_eq!(mr.reference(), "!7 Add feature");
    }
}
