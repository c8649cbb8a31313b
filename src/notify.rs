//! Collaborators the engine calls out to: the error reporter, the delete
//! confirmation prompt and the file downloader.
//!
//! The engine never renders anything itself. These traits are the seam
//! where a UI plugs in toasts, modal dialogs and file transfers.

use crate::framework::CatalogEntity;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Error reporter.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Asked before a destructive operation.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Download failed: {0}")]
pub struct DownloadError(pub String);

/// Fetches the file behind a resource.
#[async_trait]
pub trait Downloader<T: CatalogEntity>: Send + Sync {
    async fn download(&self, id: &T::Id) -> Result<(), DownloadError>;
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => info!(notice = message, "Notice"),
            NoticeKind::Error => warn!(notice = message, "Notice"),
        }
    }
}

/// Keeps every notice for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self, kind: NoticeKind) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.kind == kind)
            .map(|notice| notice.message)
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NoticeKind::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(NoticeKind::Success)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice {
                kind,
                message: message.to_string(),
            });
    }
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, message: &str) -> bool {
        info!(prompt = message, accepted = self.0, "Confirmation");
        self.0
    }
}

/// Logs the download request and succeeds. Used where no transfer
/// mechanism is wired in.
pub struct TracingDownloader<T>(PhantomData<fn() -> T>);

impl<T> Default for TracingDownloader<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

#[async_trait]
impl<T: CatalogEntity> Downloader<T> for TracingDownloader<T> {
    async fn download(&self, id: &T::Id) -> Result<(), DownloadError> {
        info!(entity_type = T::KIND, %id, "Download requested");
        Ok(())
    }
}
