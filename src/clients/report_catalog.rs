use crate::clients::CatalogHandle;
use crate::engine::{CatalogClient, CatalogError};
use crate::model::{Report, ReportCreate, ReportId, ReportUpdate};
use crate::notify::{DownloadError, Downloader, NoticeKind, Notifier};
use crate::pipeline::{LocalView, PageSlice, SortSpec};
use crate::store::PartitionName;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Client for the reports screen.
///
/// The public and private tabs are server-paginated through the engine.
/// The "recent reports" table filters, sorts and paginates its bounded
/// window locally through a [`LocalView`].
pub struct ReportCatalog {
    inner: CatalogClient<Report>,
    recent: LocalView<Report>,
    downloader: Arc<dyn Downloader<Report>>,
    notifier: Arc<dyn Notifier>,
    default_page_size: usize,
}

impl ReportCatalog {
    pub fn new(
        inner: CatalogClient<Report>,
        downloader: Arc<dyn Downloader<Report>>,
        notifier: Arc<dyn Notifier>,
        default_page_size: usize,
    ) -> Self {
        let recent = LocalView::new(default_page_size).with_default_sort(SortSpec::asc("createdAt"));
        Self {
            inner,
            recent,
            downloader,
            notifier,
            default_page_size,
        }
    }

    /// Loads every report partition; resolves when all have settled.
    pub async fn mount(&self) {
        self.inner.mount(Vec::new()).await;
    }

    /// Search, filter, sort and page state of the recent table.
    pub fn recent_view(&mut self) -> &mut LocalView<Report> {
        &mut self.recent
    }

    /// The recent table as currently filtered, sorted and paginated.
    pub fn recent_page(&self) -> PageSlice<Report> {
        let snapshot = self.inner.snapshot();
        self.recent.render(snapshot.items(PartitionName::Recent))
    }

    #[instrument(skip(self, params))]
    pub async fn upload(&self, params: ReportCreate) -> Result<Report, CatalogError> {
        debug!(?params, "upload called");
        self.inner.create(params).await
    }

    pub async fn update_report(&self, id: ReportId, update: ReportUpdate) -> Result<Report, CatalogError> {
        self.inner.update(id, update).await
    }

    /// Hands the file transfer to the downloader; failures are reported.
    #[instrument(skip(self))]
    pub async fn download(&self, id: &ReportId) -> Result<(), DownloadError> {
        match self.downloader.download(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(%id, error = %e, "Download failed");
                self.notifier
                    .notify(NoticeKind::Error, &format!("Failed to download report: {e}"));
                Err(e)
            }
        }
    }
}

impl CatalogHandle<Report> for ReportCatalog {
    fn inner(&self) -> &CatalogClient<Report> {
        &self.inner
    }

    fn default_page_size(&self) -> usize {
        self.default_page_size
    }
}
