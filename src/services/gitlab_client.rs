//! GitLab API client.
//!
//! Thin typed wrapper over GitLab REST API v4. Every operation performs one
//! request and propagates failures immediately; there are no retries and no
//! caching, the panels re-fetch whenever they re-render.

use crate::error::AppError;
use crate::models::{
    Approvals, Branch, Commit, Discussion, DiffVersion, Issue, Job, Label, Member, MergeRequest,
    Note, Pipeline, Project, User, Wiki,
};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// GitLab API client configuration.
#[derive(Debug, Clone)]
pub struct GitLabClientConfig {
    /// Base URL of the GitLab instance (e.g. `https://gitlab.com`).
    pub base_url: String,

    /// Personal access token for authentication.
    pub token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitLabClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Pagination information from GitLab API response headers.
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total: u32,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

/// A page of results plus its pagination headers.
#[derive(Debug)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub info: PageInfo,
}

/// Query parameters shared by the paginated list endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Filter by state (`opened`, `closed`, `merged`, `all`) where the
    /// endpoint supports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Substring search where the endpoint supports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Default::default()
        }
    }
}

/// Fields accepted when creating or updating an issue.
///
/// Only the set fields are sent, so the same struct serves create and the
/// partial updates behind label/assign/state actions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssuePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<i64>>,
}

/// Fields accepted when creating or updating a merge request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeRequestPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<i64>>,
}

/// Position payload for an inline diff discussion.
#[derive(Debug, Clone, Serialize)]
pub struct DiscussionPosition {
    pub base_sha: String,
    pub head_sha: String,
    pub start_sha: String,
    pub position_type: String,
    pub old_path: String,
    pub new_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line: Option<i64>,
}

/// GitLab API client.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    config: GitLabClientConfig,
}

impl GitLabClient {
    /// Create a new GitLab client.
    pub fn new(config: GitLabClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let token_value = header::HeaderValue::from_str(&config.token)
            .map_err(|_| AppError::invalid_input("Token contains invalid header characters"))?;
        headers.insert("PRIVATE-TOKEN", token_value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Full URL for a v4 REST path.
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url(), path)
    }

    /// URL of the GraphQL endpoint.
    pub(crate) fn graphql_url(&self) -> String {
        format!("{}/api/graphql", self.base_url())
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Parse pagination headers from a response.
    fn parse_pagination(response: &Response) -> PageInfo {
        let headers = response.headers();

        let get_header = |name: &str| -> Option<u32> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
        };

        PageInfo {
            page: get_header("x-page").unwrap_or(1),
            per_page: get_header("x-per-page").unwrap_or(20),
            total_pages: get_header("x-total-pages").unwrap_or(1),
            total: get_header("x-total").unwrap_or(0),
            next_page: get_header("x-next-page"),
            prev_page: get_header("x-prev-page"),
        }
    }

    /// Extract a human-readable reason from a GitLab error body.
    ///
    /// GitLab returns `{"message": "..."}` or `{"error": "..."}`; `message`
    /// is sometimes an object like `{"base": ["msg"]}`.
    fn error_reason(body: &str) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .map(|m| match m.as_str() {
                        Some(s) => s.to_string(),
                        None => m.to_string(),
                    })
            })
    }

    /// Decode a response body or convert a failure status into an error.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                AppError::response_shape(format!("{}: {}", endpoint, e))
            })
        } else {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = match (status, Self::error_reason(&body)) {
                (StatusCode::UNAUTHORIZED, _) => "Token rejected (401)".to_string(),
                (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
                (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
                (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
                (_, Some(msg)) => msg,
                _ => format!("Request failed ({}): {}", status_code, body),
            };
            Err(AppError::request_failed(message, status_code, endpoint))
        }
    }

    /// Send a request with an optional query and optional JSON body.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<&impl Serialize>,
        body: Option<&impl Serialize>,
    ) -> Result<T, AppError> {
        let url = self.api_url(endpoint);
        let mut request = self.client.request(method, &url);
        if let Some(q) = query {
            request = request.query(q);
        }
        if let Some(b) = body {
            request = request.json(b);
        }
        let response = request.send().await?;
        self.handle_response(response, endpoint).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AppError> {
        self.request(Method::GET, endpoint, None::<&()>, None::<&()>)
            .await
    }

    /// GET a list endpoint, returning the page plus its pagination headers.
    async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &impl Serialize,
    ) -> Result<Page<T>, AppError> {
        let url = self.api_url(endpoint);
        let response = self.client.get(&url).query(query).send().await?;
        let info = Self::parse_pagination(&response);
        let data = self.handle_response::<Vec<T>>(response, endpoint).await?;
        Ok(Page { data, info })
    }

    /// Send a mutating request where only the status matters.
    async fn send_empty(&self, method: Method, endpoint: &str) -> Result<(), AppError> {
        let url = self.api_url(endpoint);
        let response = self.client.request(method, &url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            let message =
                Self::error_reason(&body).unwrap_or_else(|| format!("Request failed ({})", status));
            Err(AppError::request_failed(message, status.as_u16(), endpoint))
        }
    }

    // --- project ---

    /// Resolve a project by its URL-encoded `group/name` path.
    pub async fn get_project(&self, project_path: &str) -> Result<Project, AppError> {
        let endpoint = format!("/projects/{}", urlencoding::encode(project_path));
        self.get(&endpoint).await
    }

    /// Validate the token by fetching the current user.
    pub async fn current_user(&self) -> Result<User, AppError> {
        self.get("/user").await
    }

    // --- issues ---

    pub async fn list_issues(
        &self,
        project_id: i64,
        query: &ListQuery,
    ) -> Result<Page<Issue>, AppError> {
        let endpoint = format!("/projects/{}/issues", project_id);
        self.get_page(&endpoint, query).await
    }

    pub async fn get_issue(&self, project_id: i64, iid: i64) -> Result<Issue, AppError> {
        let endpoint = format!("/projects/{}/issues/{}", project_id, iid);
        self.get(&endpoint).await
    }

    pub async fn create_issue(
        &self,
        project_id: i64,
        payload: &IssuePayload,
    ) -> Result<Issue, AppError> {
        let endpoint = format!("/projects/{}/issues", project_id);
        self.request(Method::POST, &endpoint, None::<&()>, Some(payload))
            .await
    }

    pub async fn update_issue(
        &self,
        project_id: i64,
        iid: i64,
        payload: &IssuePayload,
    ) -> Result<Issue, AppError> {
        let endpoint = format!("/projects/{}/issues/{}", project_id, iid);
        self.request(Method::PUT, &endpoint, None::<&()>, Some(payload))
            .await
    }

    pub async fn delete_issue(&self, project_id: i64, iid: i64) -> Result<(), AppError> {
        let endpoint = format!("/projects/{}/issues/{}", project_id, iid);
        self.send_empty(Method::DELETE, &endpoint).await
    }

    // --- branches ---

    pub async fn list_branches(
        &self,
        project_id: i64,
        query: &ListQuery,
    ) -> Result<Page<Branch>, AppError> {
        let endpoint = format!("/projects/{}/repository/branches", project_id);
        self.get_page(&endpoint, query).await
    }

    pub async fn get_branch(&self, project_id: i64, branch: &str) -> Result<Branch, AppError> {
        let endpoint = format!(
            "/projects/{}/repository/branches/{}",
            project_id,
            urlencoding::encode(branch)
        );
        self.get(&endpoint).await
    }

    pub async fn create_branch(
        &self,
        project_id: i64,
        branch: &str,
        from_ref: &str,
    ) -> Result<Branch, AppError> {
        let endpoint = format!("/projects/{}/repository/branches", project_id);
        self.request(
            Method::POST,
            &endpoint,
            Some(&[("branch", branch), ("ref", from_ref)]),
            None::<&()>,
        )
        .await
    }

    pub async fn delete_branch(&self, project_id: i64, branch: &str) -> Result<(), AppError> {
        let endpoint = format!(
            "/projects/{}/repository/branches/{}",
            project_id,
            urlencoding::encode(branch)
        );
        self.send_empty(Method::DELETE, &endpoint).await
    }

    // --- merge requests ---

    pub async fn get_merge_request(
        &self,
        project_id: i64,
        iid: i64,
    ) -> Result<MergeRequest, AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}", project_id, iid);
        self.get(&endpoint).await
    }

    pub async fn create_merge_request(
        &self,
        project_id: i64,
        payload: &MergeRequestPayload,
    ) -> Result<MergeRequest, AppError> {
        let endpoint = format!("/projects/{}/merge_requests", project_id);
        self.request(Method::POST, &endpoint, None::<&()>, Some(payload))
            .await
    }

    pub async fn update_merge_request(
        &self,
        project_id: i64,
        iid: i64,
        payload: &MergeRequestPayload,
    ) -> Result<MergeRequest, AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}", project_id, iid);
        self.request(Method::PUT, &endpoint, None::<&()>, Some(payload))
            .await
    }

    pub async fn delete_merge_request(&self, project_id: i64, iid: i64) -> Result<(), AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}", project_id, iid);
        self.send_empty(Method::DELETE, &endpoint).await
    }

    /// Merge an MR. Failure statuses carry GitLab's reason (conflicts,
    /// pipeline, SHA mismatch) when the body provides one.
    pub async fn merge_merge_request(&self, project_id: i64, iid: i64) -> Result<(), AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}/merge", project_id, iid);
        let url = self.api_url(&endpoint);
        let response = self.client.put(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        let message = Self::error_reason(&body).unwrap_or_else(|| match status.as_u16() {
            401 => "Not authorized to merge".into(),
            405 => "MR cannot be merged (check conflicts or pipeline)".into(),
            406 => "Branch cannot be merged".into(),
            409 => "SHA mismatch, the MR has been updated".into(),
            _ => format!("Merge failed ({})", status),
        });
        Err(AppError::request_failed(message, status.as_u16(), &endpoint))
    }

    pub async fn approve_merge_request(&self, project_id: i64, iid: i64) -> Result<(), AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}/approve", project_id, iid);
        self.send_empty(Method::POST, &endpoint).await
    }

    pub async fn unapprove_merge_request(&self, project_id: i64, iid: i64) -> Result<(), AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}/unapprove", project_id, iid);
        self.send_empty(Method::POST, &endpoint).await
    }

    pub async fn get_approvals(&self, project_id: i64, iid: i64) -> Result<Approvals, AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}/approvals", project_id, iid);
        self.get(&endpoint).await
    }

    /// Get the latest diff version of a merge request, including file diffs.
    pub async fn get_merge_request_changes(
        &self,
        project_id: i64,
        iid: i64,
    ) -> Result<DiffVersion, AppError> {
        let versions_endpoint =
            format!("/projects/{}/merge_requests/{}/versions", project_id, iid);
        let versions: Vec<serde_json::Value> = self.get(&versions_endpoint).await?;

        let version_id = versions
            .first()
            .and_then(|v| v.get("id"))
            .and_then(|id| id.as_i64())
            .ok_or_else(|| AppError::response_shape("No diff versions found"))?;

        let endpoint = format!(
            "/projects/{}/merge_requests/{}/versions/{}",
            project_id, iid, version_id
        );
        self.get(&endpoint).await
    }

    // --- wikis ---

    pub async fn list_wikis(&self, project_id: i64) -> Result<Vec<Wiki>, AppError> {
        let endpoint = format!("/projects/{}/wikis", project_id);
        self.get(&endpoint).await
    }

    pub async fn get_wiki(&self, project_id: i64, slug: &str) -> Result<Wiki, AppError> {
        let endpoint = format!(
            "/projects/{}/wikis/{}",
            project_id,
            urlencoding::encode(slug)
        );
        self.get(&endpoint).await
    }

    pub async fn create_wiki(
        &self,
        project_id: i64,
        title: &str,
        content: &str,
    ) -> Result<Wiki, AppError> {
        let endpoint = format!("/projects/{}/wikis", project_id);
        self.request(
            Method::POST,
            &endpoint,
            None::<&()>,
            Some(&serde_json::json!({ "title": title, "content": content })),
        )
        .await
    }

    pub async fn update_wiki(
        &self,
        project_id: i64,
        slug: &str,
        content: &str,
    ) -> Result<Wiki, AppError> {
        let endpoint = format!(
            "/projects/{}/wikis/{}",
            project_id,
            urlencoding::encode(slug)
        );
        self.request(
            Method::PUT,
            &endpoint,
            None::<&()>,
            Some(&serde_json::json!({ "content": content })),
        )
        .await
    }

    pub async fn delete_wiki(&self, project_id: i64, slug: &str) -> Result<(), AppError> {
        let endpoint = format!(
            "/projects/{}/wikis/{}",
            project_id,
            urlencoding::encode(slug)
        );
        self.send_empty(Method::DELETE, &endpoint).await
    }

    // --- pipelines and jobs ---

    pub async fn list_pipelines(
        &self,
        project_id: i64,
        query: &ListQuery,
    ) -> Result<Page<Pipeline>, AppError> {
        let endpoint = format!("/projects/{}/pipelines", project_id);
        self.get_page(&endpoint, query).await
    }

    pub async fn list_pipeline_jobs(
        &self,
        project_id: i64,
        pipeline_id: i64,
    ) -> Result<Vec<Job>, AppError> {
        let endpoint = format!("/projects/{}/pipelines/{}/jobs", project_id, pipeline_id);
        self.get(&endpoint).await
    }

    pub async fn retry_pipeline(&self, project_id: i64, pipeline_id: i64) -> Result<(), AppError> {
        let endpoint = format!("/projects/{}/pipelines/{}/retry", project_id, pipeline_id);
        self.send_empty(Method::POST, &endpoint).await
    }

    pub async fn cancel_pipeline(&self, project_id: i64, pipeline_id: i64) -> Result<(), AppError> {
        let endpoint = format!("/projects/{}/pipelines/{}/cancel", project_id, pipeline_id);
        self.send_empty(Method::POST, &endpoint).await
    }

    /// Get the raw log output for a job. A job with no trace yet (404)
    /// yields an empty string, not an error.
    pub async fn get_job_trace(&self, project_id: i64, job_id: i64) -> Result<String, AppError> {
        let endpoint = format!("/projects/{}/jobs/{}/trace", project_id, job_id);
        let url = self.api_url(&endpoint);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(String::new());
        }
        if !status.is_success() {
            return Err(AppError::request_failed(
                "Failed to fetch job trace",
                status.as_u16(),
                &endpoint,
            ));
        }
        Ok(response.text().await?)
    }

    pub async fn play_job(&self, project_id: i64, job_id: i64) -> Result<Job, AppError> {
        let endpoint = format!("/projects/{}/jobs/{}/play", project_id, job_id);
        self.request(Method::POST, &endpoint, None::<&()>, None::<&()>)
            .await
    }

    pub async fn retry_job(&self, project_id: i64, job_id: i64) -> Result<Job, AppError> {
        let endpoint = format!("/projects/{}/jobs/{}/retry", project_id, job_id);
        self.request(Method::POST, &endpoint, None::<&()>, None::<&()>)
            .await
    }

    pub async fn cancel_job(&self, project_id: i64, job_id: i64) -> Result<Job, AppError> {
        let endpoint = format!("/projects/{}/jobs/{}/cancel", project_id, job_id);
        self.request(Method::POST, &endpoint, None::<&()>, None::<&()>)
            .await
    }

    // --- discussions ---

    pub async fn list_discussions(
        &self,
        project_id: i64,
        mr_iid: i64,
    ) -> Result<Vec<Discussion>, AppError> {
        let endpoint = format!(
            "/projects/{}/merge_requests/{}/discussions",
            project_id, mr_iid
        );
        self.get(&endpoint).await
    }

    /// Add a plain comment to a merge request.
    pub async fn add_comment(
        &self,
        project_id: i64,
        mr_iid: i64,
        body: &str,
    ) -> Result<Note, AppError> {
        let endpoint = format!("/projects/{}/merge_requests/{}/notes", project_id, mr_iid);
        self.request(
            Method::POST,
            &endpoint,
            None::<&()>,
            Some(&serde_json::json!({ "body": body })),
        )
        .await
    }

    /// Open a new discussion thread at a diff position.
    pub async fn add_inline_comment(
        &self,
        project_id: i64,
        mr_iid: i64,
        body: &str,
        position: &DiscussionPosition,
    ) -> Result<Discussion, AppError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            body: &'a str,
            position: &'a DiscussionPosition,
        }

        let endpoint = format!(
            "/projects/{}/merge_requests/{}/discussions",
            project_id, mr_iid
        );
        self.request(
            Method::POST,
            &endpoint,
            None::<&()>,
            Some(&Payload { body, position }),
        )
        .await
    }

    pub async fn reply_to_discussion(
        &self,
        project_id: i64,
        mr_iid: i64,
        discussion_id: &str,
        body: &str,
    ) -> Result<Note, AppError> {
        let endpoint = format!(
            "/projects/{}/merge_requests/{}/discussions/{}/notes",
            project_id, mr_iid, discussion_id
        );
        self.request(
            Method::POST,
            &endpoint,
            None::<&()>,
            Some(&serde_json::json!({ "body": body })),
        )
        .await
    }

    pub async fn resolve_discussion(
        &self,
        project_id: i64,
        mr_iid: i64,
        discussion_id: &str,
        resolved: bool,
    ) -> Result<(), AppError> {
        let endpoint = format!(
            "/projects/{}/merge_requests/{}/discussions/{}",
            project_id, mr_iid, discussion_id
        );
        let url = self.api_url(&endpoint);
        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "resolved": resolved }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::request_failed(
                "Failed to resolve discussion",
                response.status().as_u16(),
                &endpoint,
            ))
        }
    }

    // --- labels, members, commits ---

    pub async fn list_labels(&self, project_id: i64) -> Result<Vec<Label>, AppError> {
        let endpoint = format!("/projects/{}/labels", project_id);
        self.get(&endpoint).await
    }

    pub async fn list_members(&self, project_id: i64) -> Result<Vec<Member>, AppError> {
        let endpoint = format!("/projects/{}/members/all", project_id);
        self.get(&endpoint).await
    }

    pub async fn list_commits(
        &self,
        project_id: i64,
        query: &ListQuery,
    ) -> Result<Page<Commit>, AppError> {
        let endpoint = format!("/projects/{}/repository/commits", project_id);
        self.get_page(&endpoint, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_construction() {
        let client = GitLabClient::new(GitLabClientConfig {
            base_url: "https://gitlab.example.com/".to_string(),
            token: "glpat-test".to_string(),
            timeout_secs: 30,
        })
        .unwrap();

        assert_eq!(
            client.api_url("/projects/1/issues"),
            "https://gitlab.example.com/api/v4/projects/1/issues"
        );
        assert_eq!(
            client.graphql_url(),
            "https://gitlab.example.com/api/graphql"
        );
    }

    #[test]
    fn test_list_query_serialization() {
        let query = ListQuery {
            state: Some("opened".to_string()),
            ..ListQuery::page(2, 30)
        };
        let json = serde_json::to_string(&query).unwrap();
        assert!(json.contains("\"page\":2"));
        assert!(json.contains("\"per_page\":30"));
        assert!(json.contains("\"state\":\"opened\""));
        assert!(!json.contains("search"));
    }

    #[test]
    fn test_issue_payload_partial() {
        let payload = IssuePayload {
            add_labels: Some("bug".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, "{\"add_labels\":\"bug\"}");
    }

    #[test]
    fn test_error_reason_extraction() {
        assert_eq!(
            GitLabClient::error_reason("{\"message\":\"404 Not found\"}"),
            Some("404 Not found".to_string())
        );
        assert_eq!(
            GitLabClient::error_reason("{\"error\":\"insufficient_scope\"}"),
            Some("insufficient_scope".to_string())
        );
        // Object-valued message falls back to its JSON form
        assert_eq!(
            GitLabClient::error_reason("{\"message\":{\"base\":[\"taken\"]}}"),
            Some("{\"base\":[\"taken\"]}".to_string())
        );
        assert_eq!(GitLabClient::error_reason("not json"), None);
    }

    #[test]
    fn test_issue_decodes_from_rest_shape() {
        let body = r#"{
            "id": 100, "iid": 3, "project_id": 1, "title": "Fix bug",
            "description": "details", "state": "opened",
            "labels": ["bug"],
            "assignees": [{"id": 7, "username": "ann", "name": "Ann"}],
            "author": {"id": 8, "username": "bob", "name": "Bob"},
            "web_url": "https://gitlab.com/g/p/-/issues/3",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }"#;
        let issue: Issue = serde_json::from_str(body).unwrap();
        assert_eq!(issue.iid, 3);
        assert_eq!(issue.assignees[0].name, "Ann");
    }
}
