//! `reqwest` implementation of the tracker port.

use super::wire::{
    PatchOperationDto, PullRequestListDto, WiqlResponseDto, WorkItemDto, new_task_patch,
    pending_parents_query, update_patch,
};
use crate::config::{PageSize, Settings};
use crate::triage::{
    domain::{MonitoredBranch, NewTaskRequest, PullRequest, UpdateRequest, WorkItem, WorkItemId},
    ports::{TrackerError, TrackerResult, WorkItemTracker},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace, warn};

const JSON_PATCH: &str = "application/json-patch+json";
const PULL_REQUEST_API_VERSION: &str = "3.0";
const WORK_ITEM_API_VERSION: &str = "1.0";
const WIQL_API_VERSION: &str = "2.2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Tracking service client speaking the REST API.
#[derive(Debug, Clone)]
pub struct HttpTracker {
    http: Client,
    base_url: String,
    project: String,
    access_token: Option<String>,
    page_size: PageSize,
}

impl HttpTracker {
    /// Builds a client from the runtime settings.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: &Settings) -> TrackerResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("qa-triage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TrackerError::transport)?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            project: settings.project.clone(),
            access_token: settings.access_token.clone(),
            page_size: settings.pull_requests_to_take,
        })
    }

    fn work_item_url(&self, id: WorkItemId) -> String {
        format!("{}/_apis/wit/workitems/{id}", self.base_url)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.access_token {
            return request.basic_auth("", Some(token));
        }
        request
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> TrackerResult<Response> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(TrackerError::transport)?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), "tracking service rejected request");
        Err(TrackerError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T>(operation: &str, response: Response) -> TrackerResult<T>
    where
        T: DeserializeOwned,
    {
        response
            .json::<T>()
            .await
            .map_err(|err| TrackerError::Decode(format!("{operation}: {err}")))
    }

    async fn patch(
        &self,
        operation: &str,
        url: &str,
        operations: &[PatchOperationDto],
    ) -> TrackerResult<Response> {
        let body = serde_json::to_string(operations)
            .map_err(|err| TrackerError::Decode(format!("{operation}: {err}")))?;
        trace!(operation, url, body = %body, "sending patch");
        let response = self
            .send(
                operation,
                self.http
                    .patch(url)
                    .header(CONTENT_TYPE, JSON_PATCH)
                    .body(body),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl WorkItemTracker for HttpTracker {
    async fn fetch_pull_requests(
        &self,
        branch: &MonitoredBranch,
    ) -> TrackerResult<Vec<PullRequest>> {
        let url = format!(
            "{}/{}/_apis/git/repositories/{}/pullRequests",
            self.base_url,
            self.project,
            branch.repository()
        );
        let mut query = vec![
            ("targetRefName", branch.ref_name()),
            ("api-version", PULL_REQUEST_API_VERSION.to_owned()),
            ("status", "completed".to_owned()),
        ];
        if let PageSize::Top(count) = self.page_size {
            query.push(("$top", count.to_string()));
        }
        debug!(%branch, "listing completed pull requests");
        let response = self
            .send("list pull requests", self.http.get(&url).query(&query))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TrackerError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                body: format!("repository '{}' not found", branch.repository()),
            });
        }
        let listing: PullRequestListDto = Self::decode("list pull requests", response).await?;
        listing
            .value
            .into_iter()
            .map(|dto| dto.into_domain())
            .collect()
    }

    async fn fetch_work_item(&self, id: WorkItemId) -> TrackerResult<Option<WorkItem>> {
        let request = self.http.get(self.work_item_url(id)).query(&[
            ("api-version", WORK_ITEM_API_VERSION),
            ("$expand", "relations"),
        ]);
        let response = self.send("fetch work item", request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(work_item = %id, "work item not found");
            return Ok(None);
        }
        let dto: WorkItemDto = Self::decode("fetch work item", response).await?;
        dto.into_domain().map(Some)
    }

    async fn apply_update(&self, request: &UpdateRequest) -> TrackerResult<()> {
        let url = format!(
            "{}?api-version={WORK_ITEM_API_VERSION}",
            self.work_item_url(request.work_item_id())
        );
        self.patch("update work item", &url, &update_patch(request))
            .await
            .map(drop)
    }

    async fn find_pending_parents(&self, developer: &str) -> TrackerResult<Vec<WorkItemId>> {
        let url = format!(
            "{}/_apis/wit/wiql?api-version={WIQL_API_VERSION}",
            self.base_url
        );
        let response = self
            .send(
                "query pending parents",
                self.http.post(&url).json(&pending_parents_query(developer)),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let result: WiqlResponseDto = Self::decode("query pending parents", response).await?;
        Ok(result.into_ids())
    }

    async fn create_child_task(&self, request: &NewTaskRequest) -> TrackerResult<WorkItemId> {
        let url = format!(
            "{}/{}/_apis/wit/workitems/$Task?api-version={WIQL_API_VERSION}",
            self.base_url, self.project
        );
        let parent_url = self.work_item_url(request.parent);
        let response = self
            .patch(
                "create task",
                &url,
                &new_task_patch(request, &parent_url),
            )
            .await?;
        let created: WorkItemDto = Self::decode("create task", response).await?;
        WorkItemId::new(created.id).map_err(|err| TrackerError::Decode(err.to_string()))
    }
}
