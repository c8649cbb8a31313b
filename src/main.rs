//! # Lab Dashboard Demo
//!
//! Runs both catalogs against seeded in-memory services and walks through
//! the list-screen flows:
//! 1.  Mounting the protocol and report screens.
//! 2.  Searching the public library (debounced).
//! 3.  Creating, submitting and archiving a protocol.
//! 4.  Browsing the recent reports table locally.
//!
//! Configuration is read from the file named by `CATALOG_CONFIG`, if set.

use catalog_engine::clients::CatalogHandle;
use catalog_engine::framework::{ResourceActor, ResourceClient};
use catalog_engine::lifecycle::{setup_tracing, Collaborators, EngineConfig, LabDashboard};
use catalog_engine::model::{
    Protocol, ProtocolCreate, Report, ReportCreate, ResourceStatus, Uploader, Visibility,
};
use catalog_engine::notify::AutoConfirm;
use catalog_engine::store::PartitionName;
use chrono::{Duration, Utc};
use tracing::{error, info, Instrument};

fn load_config() -> Result<EngineConfig, String> {
    match std::env::var("CATALOG_CONFIG") {
        Ok(path) => {
            let source = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
            EngineConfig::from_toml_str(&source).map_err(|e| e.to_string())
        }
        Err(_) => Ok(EngineConfig::default()),
    }
}

fn seeded_protocols(
    config: &EngineConfig,
) -> Result<(ResourceActor<Protocol>, ResourceClient<Protocol>), String> {
    let (mut actor, client) = catalog_engine::protocols::new_service(config);
    let now = Utc::now();
    let library = [
        ("PCR amplification", "Molecular Biology", ResourceStatus::Published),
        ("Western blot", "Protein Analysis", ResourceStatus::Approved),
        ("Cell passaging", "Cell Culture", ResourceStatus::InReview),
        ("DNA extraction", "Molecular Biology", ResourceStatus::Published),
    ];
    for (age, (title, category, status)) in library.into_iter().enumerate() {
        let params = ProtocolCreate::new(title, category, "lab-admin")
            .with_visibility(Visibility::Public)
            .with_steps(vec!["Prepare reagents".into(), "Run".into()]);
        actor
            .seed(params, now - Duration::days(age as i64), status)
            .map_err(|e| e.to_string())?;
    }
    actor
        .seed(
            ProtocolCreate::new("My gel recipe", "Molecular Biology", "alice"),
            now,
            ResourceStatus::Draft,
        )
        .map_err(|e| e.to_string())?;
    Ok((actor, client))
}

fn seeded_reports(
    config: &EngineConfig,
) -> Result<(ResourceActor<Report>, ResourceClient<Report>), String> {
    let (mut actor, client) = catalog_engine::reports::new_service(config);
    let now = Utc::now();
    let reports = [
        ("Quarterly QC", "Analysis", "pdf", Visibility::Public),
        ("Freezer incident", "Incident", "docx", Visibility::Private),
        ("Assay results", "Analysis", "xlsx", Visibility::Public),
    ];
    for (age, (title, category, format, visibility)) in reports.into_iter().enumerate() {
        let params = ReportCreate::new(title, category, format, Uploader::named("alice"))
            .with_visibility(visibility);
        actor
            .seed(params, now - Duration::hours(age as i64), ResourceStatus::Published)
            .map_err(|e| e.to_string())?;
    }
    Ok((actor, client))
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = load_config()?;
    info!(?config, "Starting lab dashboard");

    let mut dashboard = LabDashboard::with_services(
        config.clone(),
        seeded_protocols(&config)?,
        seeded_reports(&config)?,
        Collaborators::default(),
    );
    dashboard.mount_all().await;

    info!(
        public = dashboard.protocols.public_protocols().len(),
        mine = dashboard.protocols.my_protocols().len(),
        "Protocols mounted"
    );

    // Typing in the search box; only the final text is fetched
    let span = tracing::info_span!("protocol_search");
    async {
        for text in ["p", "pc", "pcr"] {
            dashboard
                .protocols
                .search(PartitionName::Public, text.to_string())
                .await;
        }
        let mut updates = dashboard.protocols.inner().subscribe();
        let quiet = config.debounce() * 4;
        while tokio::time::timeout(quiet, updates.changed()).await.is_ok() {}
        for protocol in dashboard.protocols.public_protocols() {
            info!(id = %protocol.id, title = %protocol.record.title, "Search hit");
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("protocol_authoring");
    let authoring = async {
        let params = ProtocolCreate::new("ELISA", "Immunology", "alice")
            .with_description("Sandwich ELISA for cytokines")
            .with_steps(vec!["Coat plate".into(), "Block".into(), "Detect".into()]);
        let created = dashboard
            .protocols
            .create_protocol(params)
            .await
            .map_err(|e| e.to_string())?;
        info!(id = %created.id, "Protocol created");

        let submitted = dashboard
            .protocols
            .submit_for_review(created.id.clone())
            .await
            .map_err(|e| e.to_string())?;
        info!(id = %submitted.id, status = %submitted.record.status, "Protocol submitted");

        let archived = dashboard
            .protocols
            .toggle_archive(&submitted)
            .await
            .map_err(|e| e.to_string())?;
        info!(id = %archived.id, status = %archived.record.status, "Protocol archived");

        dashboard
            .protocols
            .delete(archived.id.clone(), &AutoConfirm(true))
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await;

    match authoring {
        Ok(deleted) => info!(deleted, "Authoring flow finished"),
        Err(e) => error!(error = %e, "Authoring flow failed"),
    }

    let span = tracing::info_span!("recent_reports");
    async {
        dashboard.reports.recent_view().set_category("Analysis");
        dashboard.reports.recent_view().click_sort("title");
        let page = dashboard.reports.recent_page();
        info!(shown = page.items.len(), total = page.total, "Recent reports");
        for report in &page.items {
            info!(id = %report.id, title = %report.record.title, "Recent report");
        }
    }
    .instrument(span)
    .await;

    dashboard.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
