use crate::clients::{ProtocolCatalog, ReportCatalog};
use crate::engine::CatalogContext;
use crate::framework::{ResourceActor, ResourceClient};
use crate::lifecycle::EngineConfig;
use crate::model::{Protocol, Report};
use crate::notify::{Downloader, Notifier, TracingDownloader, TracingNotifier};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// External collaborators shared by every catalog.
#[derive(Clone)]
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub downloader: Arc<dyn Downloader<Report>>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            notifier: Arc::new(TracingNotifier),
            downloader: Arc::new(TracingDownloader::default()),
        }
    }
}

/// The runtime orchestrator for the lab catalog dashboard.
///
/// `LabDashboard` is responsible for:
/// - **Lifecycle Management**: starting and stopping the backing services and catalog engines
/// - **Dependency Wiring**: each catalog engine receives its backing service as provider
///   and the shared notifier as error reporter
///
/// # Example
///
/// ```ignore
/// let dashboard = LabDashboard::new(EngineConfig::default(), Collaborators::default());
/// dashboard.mount_all().await;
///
/// let created = dashboard.protocols.create_protocol(params).await?;
///
/// dashboard.shutdown().await?;
/// ```
pub struct LabDashboard {
    pub protocols: ProtocolCatalog,
    pub reports: ReportCatalog,

    /// Direct access to the backing services, bypassing the views.
    pub protocol_service: ResourceClient<Protocol>,
    pub report_service: ResourceClient<Report>,

    /// Catalog engines first, backing services last.
    handles: Vec<JoinHandle<()>>,
}

impl LabDashboard {
    /// Starts empty backing services and the catalogs on top of them.
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        let protocol_service = crate::protocols::new_service(&config);
        let report_service = crate::reports::new_service(&config);
        Self::with_services(config, protocol_service, report_service, collaborators)
    }

    /// Starts the catalogs on top of pre-built (possibly seeded) services.
    pub fn with_services(
        config: EngineConfig,
        protocol_service: (ResourceActor<Protocol>, ResourceClient<Protocol>),
        report_service: (ResourceActor<Report>, ResourceClient<Report>),
        collaborators: Collaborators,
    ) -> Self {
        let (protocol_store, protocol_client) = protocol_service;
        let (report_store, report_client) = report_service;

        let (protocol_engine, protocols) = crate::protocols::new_catalog(&config);
        let (report_engine, reports) = crate::reports::new_catalog(
            &config,
            collaborators.downloader.clone(),
            collaborators.notifier.clone(),
        );

        let protocol_engine_handle = tokio::spawn(protocol_engine.run(CatalogContext {
            provider: Arc::new(protocol_client.clone()),
            notifier: collaborators.notifier.clone(),
        }));
        let report_engine_handle = tokio::spawn(report_engine.run(CatalogContext {
            provider: Arc::new(report_client.clone()),
            notifier: collaborators.notifier.clone(),
        }));
        let protocol_store_handle = tokio::spawn(protocol_store.run());
        let report_store_handle = tokio::spawn(report_store.run());

        Self {
            protocols,
            reports,
            protocol_service: protocol_client,
            report_service: report_client,
            handles: vec![
                protocol_engine_handle,
                report_engine_handle,
                protocol_store_handle,
                report_store_handle,
            ],
        }
    }

    /// Mounts both catalogs concurrently. A failing fetch is reported and
    /// leaves its partition empty; it never blocks the others.
    pub async fn mount_all(&self) {
        info!("Mounting dashboard");
        futures::future::join(self.protocols.mount(), self.reports.mount()).await;
        info!("Dashboard mounted");
    }

    /// Gracefully shuts down every task.
    ///
    /// Dropping the catalog clients ends the engines, which releases their
    /// provider handles; dropping the service clients then ends the services.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down dashboard...");

        drop(self.protocols);
        drop(self.reports);
        drop(self.protocol_service);
        drop(self.report_service);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(format!("Task failed: {:?}", e));
            }
        }

        info!("Dashboard shutdown complete.");
        Ok(())
    }
}
