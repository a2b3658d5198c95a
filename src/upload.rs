//! Sequential batch upload.
//!
//! Files go up one at a time, in the order given. Each request is awaited
//! before the next starts, so at most one entry is ever `Uploading` and the
//! progress counter moves in exact steps of one. A failed file is logged and
//! counted; the queue keeps going. There is no cancellation, no retry and no
//! per-request timeout.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::MediaApi;
use crate::error::UploadError;

// ── Inputs ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadFile { name: name.into(), mime: mime.into(), bytes }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(UploadFile::new(name, mime_for(path), bytes))
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Attached identically to every request of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFields {
    /// Client that owns the media.
    pub owner_id: String,
    pub folder_id: Option<String>,
    pub csrf_token: String,
}

// ── Job state ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    Queued,
    Uploading,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct UploadEntry {
    pub file: UploadFile,
    pub state: EntryState,
}

/// One user-initiated batch.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub id: Uuid,
    pub fields: UploadFields,
    entries: Vec<UploadEntry>,
}

impl UploadJob {
    /// Check preconditions and queue every file. Nothing is sent yet.
    pub fn new(files: Vec<UploadFile>, fields: UploadFields) -> Result<Self, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }
        if fields.owner_id.trim().is_empty() {
            return Err(UploadError::MissingField("owner_id"));
        }
        if fields.csrf_token.trim().is_empty() {
            return Err(UploadError::MissingField("csrf_token"));
        }

        let entries = files
            .into_iter()
            .map(|file| UploadEntry { file, state: EntryState::Queued })
            .collect();
        Ok(UploadJob { id: Uuid::new_v4(), fields, entries })
    }

    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn uploading(&self) -> usize {
        self.entries.iter().filter(|e| e.state == EntryState::Uploading).count()
    }
}

// ── Reporting ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `round(100 * completed / total)`, never above 100.
    pub percent: u8,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((completed.min(total) * 100 + total / 2) / total) as u8
        };
        Progress { completed, total, percent }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Succeeded,
    Failed(String),
}

/// One per-file log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLog {
    pub index: usize,
    pub name: String,
    pub outcome: FileOutcome,
}

impl FileLog {
    pub fn succeeded(&self) -> bool {
        self.outcome == FileOutcome::Succeeded
    }

    /// Human-readable line, tagged by outcome.
    pub fn line(&self) -> String {
        match &self.outcome {
            FileOutcome::Succeeded => format!("✓ uploaded: {}", self.name),
            FileOutcome::Failed(reason) => format!("✗ failed: {} ({reason})", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub job: Uuid,
    pub success_count: usize,
    pub error_count: usize,
    /// One entry per file, in submission order.
    pub log: Vec<FileLog>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl UploadSummary {
    pub fn title(&self) -> &'static str {
        match (self.success_count, self.error_count) {
            (_, 0) => "Upload finished",
            (0, _) => "Upload failed",
            _ => "Finished with errors",
        }
    }
}

/// Receives the pipeline's reports, typically a progress dialog.
pub trait UploadObserver {
    fn on_file_done(&mut self, log: &FileLog);
    fn on_progress(&mut self, progress: Progress);
    fn on_complete(&mut self, summary: &UploadSummary);
}

// ── Pipeline ───────────────────────────────────────────────────

pub struct UploadPipeline<'a, A: MediaApi + ?Sized> {
    api: &'a A,
    pace: Duration,
}

impl<'a, A: MediaApi + ?Sized> UploadPipeline<'a, A> {
    pub fn new(api: &'a A) -> Self {
        UploadPipeline { api, pace: Duration::ZERO }
    }

    /// Pause between consecutive uploads. The first file is never delayed.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Run the whole job to completion and return the summary, which is also
    /// handed to the observer.
    pub async fn run(&self, job: &mut UploadJob, observer: &mut dyn UploadObserver) -> UploadSummary {
        let span = info_span!("upload_batch", job = %job.id, files = job.len());
        self.drive(job, observer).instrument(span).await
    }

    async fn drive(&self, job: &mut UploadJob, observer: &mut dyn UploadObserver) -> UploadSummary {
        let started_at = Utc::now();
        let total = job.len();
        let mut log = Vec::with_capacity(total);
        let mut success_count = 0;
        let mut error_count = 0;

        info!(total, "upload queue started");

        for index in 0..total {
            if index > 0 && !self.pace.is_zero() {
                tokio::time::sleep(self.pace).await;
            }

            job.entries[index].state = EntryState::Uploading;
            debug_assert_eq!(job.uploading(), 1);

            let entry = &job.entries[index];
            info!(file = %entry.file.name, index, "uploading");
            let result = self.api.upload_file(&entry.file, &job.fields).await;

            let outcome = match result {
                Ok(()) => {
                    success_count += 1;
                    job.entries[index].state = EntryState::Succeeded;
                    FileOutcome::Succeeded
                }
                Err(e) => {
                    error_count += 1;
                    warn!(file = %job.entries[index].file.name, error = %e, "upload failed");
                    let reason = e.to_string();
                    job.entries[index].state = EntryState::Failed(reason.clone());
                    FileOutcome::Failed(reason)
                }
            };

            let line = FileLog { index, name: job.entries[index].file.name.clone(), outcome };
            observer.on_file_done(&line);
            observer.on_progress(Progress::new(index + 1, total));
            log.push(line);
        }

        let summary = UploadSummary {
            job: job.id,
            success_count,
            error_count,
            log,
            started_at,
            finished_at: Utc::now(),
        };
        info!(success_count, error_count, "upload queue finished");
        observer.on_complete(&summary);
        summary
    }
}

// ── Tests ──────────────────────────────────────────────────────
