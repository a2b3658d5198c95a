//! Backend collaborators.
//!
//! The controller and the upload pipeline only see the [`BoardApi`] and
//! [`MediaApi`] traits. [`HttpBackend`] implements both over `reqwest`; tests
//! substitute in-memory fakes.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::board::BoardLayout;
use crate::error::ApiError;
use crate::settings::{Settings, UploadSettings};
use crate::task::{NewTask, TaskDetails, TaskId};
use crate::upload::{UploadFields, UploadFile};
use crate::wire::{self, TaskRecord, UpdateTaskRequest};

/// Header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Form field carrying the anti-forgery token in multipart uploads.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Persist a move: new status plus the full destination order.
    async fn update_task(&self, request: &UpdateTaskRequest) -> Result<(), ApiError>;

    /// Create a task; returns the backend's canonical record.
    async fn create_task(&self, task: &NewTask, layout: BoardLayout) -> Result<TaskRecord, ApiError>;

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError>;

    async fn task_details(&self, id: &TaskId) -> Result<TaskDetails, ApiError>;
}

#[async_trait]
pub trait MediaApi: Send + Sync {
    /// Upload one file. `Ok` only when the backend confirmed success.
    async fn upload_file(&self, file: &UploadFile, fields: &UploadFields) -> Result<(), ApiError>;
}

// ── HTTP implementation ────────────────────────────────────────

/// `reqwest` client bound to one backend. No request timeout is set: a
/// stalled request stalls its caller.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    csrf_token: String,
    endpoints: crate::settings::Endpoints,
    upload: UploadSettings,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("agency-board/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpBackend {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            csrf_token: settings.csrf_token.clone(),
            endpoints: settings.endpoints.clone(),
            upload: settings.upload.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `<base_url><base><id>/`, with the id percent-encoded as one segment.
    fn task_url(&self, base: &str, id: &TaskId) -> Result<Url, ApiError> {
        let raw = self.url(base);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::Network(format!("invalid URL '{raw}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Network(format!("URL '{raw}' cannot take a path")))?
            .pop_if_empty()
            .push(id.as_str())
            .push("");
        Ok(url)
    }

    async fn read(response: Response) -> Result<(u16, String), ApiError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "backend responded");
        Ok((status, body))
    }
}

#[async_trait]
impl BoardApi for HttpBackend {
    async fn update_task(&self, request: &UpdateTaskRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&self.endpoints.update_task))
            .header(CSRF_HEADER, &self.csrf_token)
            .json(request)
            .send()
            .await?;
        let (status, body) = Self::read(response).await?;
        wire::expect_success(status, &body)?;
        Ok(())
    }

    async fn create_task(&self, task: &NewTask, layout: BoardLayout) -> Result<TaskRecord, ApiError> {
        let mut form = Form::new()
            .text("title", task.title.clone())
            .text("kanban_type", layout.as_str());
        if let Some(description) = &task.description {
            form = form.text("description", description.clone());
        }
        if let Some(priority) = task.priority {
            form = form.text("priority", priority.as_str());
        }
        if let Some(assignee) = &task.assigned_to {
            form = form.text("assigned_to", assignee.clone());
        }
        if let Some(project) = &task.project {
            form = form.text("project", project.clone());
        }
        for tag in &task.tags {
            form = form.text("tags", tag.clone());
        }

        let response = self
            .client
            .post(self.url(&self.endpoints.create_task))
            .header(CSRF_HEADER, &self.csrf_token)
            .multipart(form)
            .send()
            .await?;
        let (status, body) = Self::read(response).await?;
        let value = wire::classify(status, &body)?;
        wire::created_task(status, value)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.task_url(&self.endpoints.delete_task_base, id)?)
            .header(CSRF_HEADER, &self.csrf_token)
            .send()
            .await?;
        let (status, body) = Self::read(response).await?;
        if (200..300).contains(&status) {
            return Ok(());
        }
        wire::classify(status, &body).map(|_| ())
    }

    async fn task_details(&self, id: &TaskId) -> Result<TaskDetails, ApiError> {
        let response = self
            .client
            .get(self.task_url(&self.endpoints.task_details_base, id)?)
            .send()
            .await?;
        let (status, body) = Self::read(response).await?;
        let value = wire::classify(status, &body)?;
        serde_json::from_value(value).map_err(|e| ApiError::Server {
            status,
            message: format!("details have unexpected shape: {e}"),
        })
    }
}

#[async_trait]
impl MediaApi for HttpBackend {
    async fn upload_file(&self, file: &UploadFile, fields: &UploadFields) -> Result<(), ApiError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| ApiError::Validation {
                status: 0,
                message: format!("invalid MIME type '{}': {e}", file.mime),
                errors: Default::default(),
            })?;

        let mut form = Form::new()
            .part(self.upload.file_field.clone(), part)
            .text(self.upload.owner_field.clone(), fields.owner_id.clone())
            .text(CSRF_FIELD, fields.csrf_token.clone());
        if let Some(folder) = &fields.folder_id {
            form = form.text(self.upload.folder_field.clone(), folder.clone());
        }

        let response = self
            .client
            .post(self.url(&self.endpoints.upload_file))
            .header(CSRF_HEADER, &fields.csrf_token)
            .multipart(form)
            .send()
            .await?;
        let (status, body) = Self::read(response).await?;
        wire::expect_success(status, &body)?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
