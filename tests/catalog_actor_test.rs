use catalog_engine::engine::{CatalogActor, CatalogClient, CatalogContext, CatalogError};
use catalog_engine::framework::mock::{
    create_mock_client, expect_archive, expect_create, expect_get_many, MockClient,
};
use catalog_engine::framework::{FailureKind, ProviderError, ResourceRequest};
use catalog_engine::lifecycle::EngineConfig;
use catalog_engine::model::{Protocol, ProtocolCreate, ProtocolId, ResourceRecord, ResourceStatus, Visibility};
use catalog_engine::notify::{AutoConfirm, RecordingNotifier};
use catalog_engine::query::{FilterState, PageMeta, ProviderPage};
use catalog_engine::store::{CatalogSnapshot, PartitionName};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const DEBOUNCE: Duration = Duration::from_millis(500);

fn protocol(id: u32, visibility: Visibility) -> Protocol {
    let mut record = ResourceRecord::new(format!("Protocol {id}"), "Molecular Biology", "alice", Utc::now());
    record.visibility = visibility;
    record.status = ResourceStatus::Published;
    Protocol {
        id: ProtocolId(id),
        record,
        version: "1.0.0".into(),
        steps: Vec::new(),
    }
}

fn page(items: Vec<Protocol>) -> ProviderPage<Protocol> {
    let total = items.len();
    ProviderPage {
        data: items,
        pagination: PageMeta {
            total,
            total_pages: 1,
        },
    }
}

fn ids(snapshot: &CatalogSnapshot<Protocol>, partition: PartitionName) -> Vec<u32> {
    snapshot.ids(partition).into_iter().map(|id| id.0).collect()
}

fn public_search(text: &str) -> FilterState {
    FilterState::new(PartitionName::Public, 10).with_search(text)
}

struct Harness {
    client: CatalogClient<Protocol>,
    requests: mpsc::Receiver<ResourceRequest<Protocol>>,
    notifier: RecordingNotifier,
    handle: JoinHandle<()>,
}

/// Real catalog engine, hand-driven provider.
fn harness(config: EngineConfig) -> Harness {
    let (actor, client) = CatalogActor::<Protocol>::new(config, &catalog_engine::protocols::PARTITIONS);
    let (provider, requests) = create_mock_client::<Protocol>(16);
    let notifier = RecordingNotifier::new();
    let handle = tokio::spawn(actor.run(CatalogContext {
        provider: Arc::new(provider),
        notifier: Arc::new(notifier.clone()),
    }));
    Harness {
        client,
        requests,
        notifier,
        handle,
    }
}

/// Answers the two mount fetches by the visibility they ask for.
async fn answer_mount(
    requests: &mut mpsc::Receiver<ResourceRequest<Protocol>>,
    public: Vec<Protocol>,
    mine: Vec<Protocol>,
) {
    let mut public = Some(public);
    let mut mine = Some(mine);
    for _ in 0..2 {
        let (query, responder) = expect_get_many(requests).await.expect("mount fetch");
        let items = match query.is_public {
            Some(true) => public.take(),
            _ => mine.take(),
        };
        responder.send(Ok(page(items.unwrap_or_default()))).unwrap();
    }
}

async fn mounted(config: EngineConfig, public: Vec<Protocol>, mine: Vec<Protocol>) -> Harness {
    let mut harness = harness(config);
    tokio::join!(
        harness.client.mount(Vec::new()),
        answer_mount(&mut harness.requests, public, mine)
    );
    harness
}

async fn shutdown(harness: Harness) {
    drop(harness.client);
    harness.handle.await.unwrap();
}

/// Pattern 1: Engine + hand-driven provider.
/// A burst of filter changes inside the debounce window reaches the provider once.
#[tokio::test(start_paused = true)]
async fn test_filter_burst_dispatches_one_fetch() {
    let mut harness = harness(EngineConfig::default().with_debounce(DEBOUNCE));

    for text in ["p", "pc", "pcr"] {
        harness.client.set_filters(public_search(text)).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let (query, responder) = expect_get_many(&mut harness.requests).await.unwrap();
    assert_eq!(query.search.as_deref(), Some("pcr"));
    assert_eq!(query.page, 1);
    assert_eq!(query.is_public, Some(true));
    assert_eq!(query.exclude_in_review, Some(true));
    responder.send(Ok(page(vec![protocol(1, Visibility::Public)]))).unwrap();

    // No second fetch follows
    let next = tokio::time::timeout(Duration::from_secs(5), harness.requests.recv()).await;
    assert!(next.is_err(), "unexpected request: {next:?}");

    let snapshot = harness.client.snapshot();
    assert_eq!(ids(&snapshot, PartitionName::Public), vec![1]);
    assert!(!snapshot.is_loading(PartitionName::Public));

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_republishing_dispatched_filters_is_ignored() {
    let mut harness = harness(EngineConfig::default().with_debounce(DEBOUNCE));

    harness.client.set_filters(public_search("gel")).await;
    let (_, responder) = expect_get_many(&mut harness.requests).await.unwrap();
    responder.send(Ok(page(Vec::new()))).unwrap();

    harness.client.set_filters(public_search("gel")).await;
    let next = tokio::time::timeout(Duration::from_secs(5), harness.requests.recv()).await;
    assert!(next.is_err(), "unexpected request: {next:?}");

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let mut harness = harness(EngineConfig::default().with_debounce(DEBOUNCE));

    harness.client.set_filters(public_search("a")).await;
    let (_, first) = expect_get_many(&mut harness.requests).await.unwrap();

    harness.client.set_filters(public_search("b")).await;
    let (query, second) = expect_get_many(&mut harness.requests).await.unwrap();
    assert_eq!(query.search.as_deref(), Some("b"));

    // Newest answers first, the older response arrives late
    second.send(Ok(page(vec![protocol(2, Visibility::Public)]))).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    first.send(Ok(page(vec![protocol(1, Visibility::Public)]))).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = harness.client.snapshot();
    assert_eq!(ids(&snapshot, PartitionName::Public), vec![2]);
    assert!(!snapshot.is_loading(PartitionName::Public));

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_only_latest_fetch_clears_loading() {
    let mut harness = harness(EngineConfig::default().with_debounce(DEBOUNCE));

    harness.client.set_filters(public_search("a")).await;
    let (_, first) = expect_get_many(&mut harness.requests).await.unwrap();
    harness.client.set_filters(public_search("b")).await;
    let (_, second) = expect_get_many(&mut harness.requests).await.unwrap();

    first.send(Ok(page(vec![protocol(1, Visibility::Public)]))).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = harness.client.snapshot();
    assert!(snapshot.is_loading(PartitionName::Public));
    assert!(ids(&snapshot, PartitionName::Public).is_empty());

    second.send(Ok(page(vec![protocol(2, Visibility::Public)]))).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = harness.client.snapshot();
    assert!(!snapshot.is_loading(PartitionName::Public));
    assert_eq!(ids(&snapshot, PartitionName::Public), vec![2]);

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_returns_to_first_page() {
    let mut harness = mounted(
        EngineConfig::default().with_debounce(DEBOUNCE),
        vec![protocol(1, Visibility::Public)],
        Vec::new(),
    )
    .await;

    harness
        .client
        .set_filters(FilterState::new(PartitionName::Public, 10).with_page(3))
        .await;
    let (query, responder) = expect_get_many(&mut harness.requests).await.unwrap();
    assert_eq!(query.page, 3);
    responder.send(Ok(page(Vec::new()))).unwrap();

    let on_page_three = harness.client.filters(PartitionName::Public).await.unwrap();
    harness.client.set_filters(on_page_three.with_search("pcr")).await;
    let (query, responder) = expect_get_many(&mut harness.requests).await.unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(query.search.as_deref(), Some("pcr"));
    responder.send(Ok(page(Vec::new()))).unwrap();

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_keeps_last_good_data() {
    let mut harness = mounted(
        EngineConfig::default(),
        vec![protocol(1, Visibility::Public), protocol(2, Visibility::Public)],
        vec![protocol(3, Visibility::Private)],
    )
    .await;

    let refresh = harness.client.refresh(PartitionName::Public);
    let answer = async {
        let (_, responder) = expect_get_many(&mut harness.requests).await.unwrap();
        responder
            .send(Err(ProviderError::Network("connection reset".into())))
            .unwrap();
    };
    tokio::join!(refresh, answer);

    let snapshot = harness.client.snapshot();
    assert_eq!(ids(&snapshot, PartitionName::Public), vec![1, 2]);
    assert_eq!(ids(&snapshot, PartitionName::Mine), vec![3]);
    assert!(!snapshot.any_loading());
    assert_eq!(
        harness.notifier.errors(),
        vec!["Failed to load public protocols: Network error: connection reset".to_string()]
    );

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_mount_fetch_does_not_block_other_partitions() {
    let mut harness = harness(EngineConfig::default());

    let mount = harness.client.mount(Vec::new());
    let answer = async {
        for _ in 0..2 {
            let (query, responder) = expect_get_many(&mut harness.requests).await.unwrap();
            let result = match query.is_public {
                Some(true) => Err(ProviderError::Network("connection refused".into())),
                _ => Ok(page(vec![protocol(7, Visibility::Private)])),
            };
            responder.send(result).unwrap();
        }
    };
    tokio::join!(mount, answer);

    let snapshot = harness.client.snapshot();
    assert!(ids(&snapshot, PartitionName::Public).is_empty());
    assert!(!snapshot.is_loading(PartitionName::Public));
    assert_eq!(ids(&snapshot, PartitionName::Mine), vec![7]);
    assert!(!snapshot.any_loading());
    assert_eq!(
        harness.notifier.errors(),
        vec!["Failed to load public protocols: Network error: connection refused".to_string()]
    );

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_fetch_times_out() {
    let config = EngineConfig::default().with_request_timeout(Duration::from_secs(1));
    let mut harness = mounted(config, vec![protocol(1, Visibility::Public)], Vec::new()).await;

    let refresh = harness.client.refresh(PartitionName::Public);
    let hold = async {
        let (_, responder) = expect_get_many(&mut harness.requests).await.unwrap();
        responder
    };
    let ((), _responder) = tokio::join!(refresh, hold);

    let snapshot = harness.client.snapshot();
    assert!(!snapshot.is_loading(PartitionName::Public));
    assert_eq!(ids(&snapshot, PartitionName::Public), vec![1]);
    assert_eq!(
        harness.notifier.errors(),
        vec!["Failed to load public protocols: Request timed out after 1s".to_string()]
    );

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_rejected_create_changes_nothing() {
    let mut harness = mounted(
        EngineConfig::default(),
        vec![protocol(1, Visibility::Public)],
        vec![protocol(2, Visibility::Private)],
    )
    .await;
    let before = harness.client.snapshot();

    let create = harness
        .client
        .create(ProtocolCreate::new("", "Molecular Biology", "alice"));
    let answer = async {
        let (params, responder) = expect_create(&mut harness.requests).await.unwrap();
        assert_eq!(params.visibility, Visibility::Private);
        // In flight: only the receiving partition shows a spinner
        let during = harness.client.snapshot();
        assert!(during.is_loading(PartitionName::Mine));
        assert!(!during.is_loading(PartitionName::Public));
        responder
            .send(Err(ProviderError::Validation("title must not be empty".into())))
            .unwrap();
    };
    let (result, ()) = tokio::join!(create, answer);

    let error = result.unwrap_err();
    assert_eq!(error.failure_kind(), FailureKind::Validation);
    assert_eq!(harness.client.snapshot().as_ref(), before.as_ref());
    assert_eq!(
        harness.notifier.errors(),
        vec!["Failed to create protocol: Validation failed: title must not be empty".to_string()]
    );

    shutdown(harness).await;
}

#[tokio::test(start_paused = true)]
async fn test_archive_replaces_where_held() {
    let mut harness = mounted(
        EngineConfig::default(),
        vec![protocol(1, Visibility::Public), protocol(2, Visibility::Public)],
        vec![protocol(3, Visibility::Private)],
    )
    .await;

    let archive = harness.client.archive(ProtocolId(2));
    let answer = async {
        let (id, responder) = expect_archive(&mut harness.requests).await.unwrap();
        let during = harness.client.snapshot();
        assert!(during.is_loading(PartitionName::Public));
        assert!(!during.is_loading(PartitionName::Mine));

        let mut archived = protocol(id.0, Visibility::Public);
        archived.record.status = ResourceStatus::Archived;
        responder.send(Ok(archived)).unwrap();
    };
    let (result, ()) = tokio::join!(archive, answer);

    assert_eq!(result.unwrap().record.status, ResourceStatus::Archived);
    let snapshot = harness.client.snapshot();
    assert_eq!(ids(&snapshot, PartitionName::Public), vec![1, 2]);
    assert_eq!(
        snapshot.items(PartitionName::Public)[1].record.status,
        ResourceStatus::Archived
    );
    assert!(!snapshot.any_loading());
    assert_eq!(
        harness.notifier.successes(),
        vec!["Protocol archived successfully".to_string()]
    );

    shutdown(harness).await;
}

/// Pattern 2: Engine + scripted mock.
#[tokio::test]
async fn test_scripted_delete_failure_keeps_item() {
    let mock = MockClient::<Protocol>::new();
    mock.expect_get_many().return_ok(page(vec![protocol(1, Visibility::Public)]));
    mock.expect_get_many().return_ok(page(vec![protocol(1, Visibility::Public)]));
    mock.expect_delete()
        .return_err(ProviderError::Network("gateway timeout".into()));

    let (actor, client) = CatalogActor::<Protocol>::new(EngineConfig::default(), &[(
        PartitionName::Public,
        catalog_engine::store::PartitionMode::ServerPaginated,
    )]);
    let notifier = RecordingNotifier::new();
    let handle = tokio::spawn(actor.run(CatalogContext {
        provider: Arc::new(mock.client()),
        notifier: Arc::new(notifier.clone()),
    }));

    client.mount(Vec::new()).await;
    client.refresh(PartitionName::Public).await;
    assert_eq!(ids(&client.snapshot(), PartitionName::Public), vec![1]);

    let result = client.delete(ProtocolId(1), &AutoConfirm(true)).await;
    assert!(matches!(result, Err(CatalogError::Provider(ProviderError::Network(_)))));
    assert_eq!(ids(&client.snapshot(), PartitionName::Public), vec![1]);
    assert_eq!(
        notifier.errors(),
        vec!["Failed to delete protocol: Network error: gateway timeout".to_string()]
    );

    mock.verify();
    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_closed_engine_rejects_writes() {
    let (actor, client) =
        CatalogActor::<Protocol>::new(EngineConfig::default(), &catalog_engine::protocols::PARTITIONS);
    drop(actor);

    // Read paths log and return
    client.set_filters(public_search("pcr")).await;
    assert!(client.filters(PartitionName::Public).await.is_none());

    let result = client.archive(ProtocolId(1)).await;
    assert_eq!(result.unwrap_err(), CatalogError::EngineClosed);
}
