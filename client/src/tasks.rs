//! Resource accessors for `/tasks` on a json-server style API.

use reqwest::Method;
use tracing::debug;

use taskdesk_types::{QueryKey, Task, TaskId, TaskPage};

use crate::{ApiClient, ApiError, ensure_success};

/// Header json-server uses to report the unpaginated match count.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

impl ApiClient {
    /// `GET /tasks?_page=&_limit=[&title_like=]`.
    ///
    /// `title_like` is only sent for a non-blank search term. The total comes
    /// from `X-Total-Count`, or the number of returned rows if the server does
    /// not send it.
    pub async fn list_tasks(&self, key: &QueryKey) -> Result<TaskPage, ApiError> {
        let mut url = self.task_url("tasks")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("_page", &key.page.to_string());
            query.append_pair("_limit", &key.page_size.to_string());
            if let Some(search) = key.search_filter() {
                query.append_pair("title_like", search);
            }
        }
        debug!(%key, "Listing tasks");

        let response = ensure_success(self.request(Method::GET, url).send().await?).await?;
        let header_total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let tasks: Vec<Task> = response.json().await?;
        let total = header_total.unwrap_or(tasks.len() as u64);

        Ok(TaskPage { tasks, total })
    }

    /// `POST /tasks`. Returns the record as stored by the server.
    pub async fn create_task(&self, task: &Task) -> Result<Task, ApiError> {
        let url = self.task_url("tasks")?;
        debug!(id = %task.id, "Creating task");
        let response = ensure_success(
            self.request(Method::POST, url).json(task).send().await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    /// `PUT /tasks/{id}`.
    pub async fn update_task(&self, id: &TaskId, task: &Task) -> Result<Task, ApiError> {
        let url = self.task_url(&format!("tasks/{}", id.as_path_segment()))?;
        debug!(%id, "Updating task");
        let response = ensure_success(
            self.request(Method::PUT, url).json(task).send().await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    /// `DELETE /tasks/{id}`.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let url = self.task_url(&format!("tasks/{}", id.as_path_segment()))?;
        debug!(%id, "Deleting task");
        ensure_success(self.request(Method::DELETE, url).send().await?).await?;
        Ok(())
    }
}
