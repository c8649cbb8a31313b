//! # Mock Provider
//!
//! Utilities for testing the engine without a real backing service.
//!
//! [`MockClient`] answers from a queue of scripted responses. For ordering
//! and timing scenarios use [`create_mock_client`]: the test receives every
//! request together with its responder and decides when (and in which order)
//! to answer.

use crate::framework::{CatalogEntity, ProviderError, ResourceClient, ResourceRequest};
use crate::query::{ProviderPage, ProviderQuery};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// A scripted response, matched against the next incoming request.
enum Expectation<T: CatalogEntity> {
    GetMany(Result<ProviderPage<T>, ProviderError>),
    Create(Result<T, ProviderError>),
    Update(Result<T, ProviderError>),
    Duplicate(Result<T, ProviderError>),
    Archive(Result<T, ProviderError>),
    Restore(Result<T, ProviderError>),
    Delete(Result<(), ProviderError>),
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: CatalogEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock provider with expectation tracking.
///
/// # Example
/// ```ignore
/// let mock = MockClient::<Protocol>::new();
/// mock.expect_get_many().return_ok(ProviderPage::empty());
/// mock.expect_archive().return_ok(archived);
///
/// let provider = mock.client();
/// // Hand `provider` to a CatalogActor...
/// mock.verify();
/// ```
pub struct MockClient<T: CatalogEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: CatalogEntity> MockClient<T> {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (ResourceRequest::GetMany { respond_to, .. }, Some(Expectation::GetMany(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Duplicate { respond_to, .. }, Some(Expectation::Duplicate(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Archive { respond_to, .. }, Some(Expectation::Archive(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Restore { respond_to, .. }, Some(Expectation::Restore(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Delete { respond_to, .. }, Some(Expectation::Delete(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn expect<R>(&self, wrap: fn(Result<R, ProviderError>) -> Expectation<T>) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap,
        }
    }

    pub fn expect_get_many(&self) -> ExpectationBuilder<T, ProviderPage<T>> {
        self.expect(Expectation::GetMany)
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.expect(Expectation::Create)
    }

    pub fn expect_update(&self) -> ExpectationBuilder<T, T> {
        self.expect(Expectation::Update)
    }

    pub fn expect_duplicate(&self) -> ExpectationBuilder<T, T> {
        self.expect(Expectation::Duplicate)
    }

    pub fn expect_archive(&self) -> ExpectationBuilder<T, T> {
        self.expect(Expectation::Archive)
    }

    pub fn expect_restore(&self) -> ExpectationBuilder<T, T> {
        self.expect(Expectation::Restore)
    }

    pub fn expect_delete(&self) -> ExpectationBuilder<T, ()> {
        self.expect(Expectation::Delete)
    }

    /// Panics if any scripted response was never consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

impl<T: CatalogEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues one scripted response.
pub struct ExpectationBuilder<T: CatalogEntity, R> {
    expectations: Queue<T>,
    wrap: fn(Result<R, ProviderError>) -> Expectation<T>,
}

impl<T: CatalogEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        lock(&self.expectations).push_back((self.wrap)(Ok(value)));
    }

    pub fn return_err(self, error: ProviderError) {
        lock(&self.expectations).push_back((self.wrap)(Err(error)));
    }
}

// =============================================================================
// MANUAL RESPONDERS
// =============================================================================

pub type Responder<R> = oneshot::Sender<Result<R, ProviderError>>;

/// Creates a provider client plus the receiving end of its mailbox.
///
/// # Testing Strategy
/// Holding the receiver lets a test play the backing service by hand:
/// take requests with the `expect_*` helpers below, keep their responders,
/// and answer them in any order. That is how out-of-order responses and
/// slow requests are simulated deterministically.
pub fn create_mock_client<T: CatalogEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a GetMany request.
pub async fn expect_get_many<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(ProviderQuery, Responder<ProviderPage<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::GetMany { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Next message must be a Create request.
pub async fn expect_create<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be an Update request.
pub async fn expect_update<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, update, respond_to }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next message must be an Archive request.
pub async fn expect_archive<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Archive { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a Delete request.
pub async fn expect_delete<T: CatalogEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ResourceProvider;
    use crate::model::{Protocol, ProtocolCreate, ProtocolId, ResourceRecord};
    use crate::query::PageMeta;
    use chrono::Utc;

    fn protocol(id: u32) -> Protocol {
        Protocol {
            id: ProtocolId(id),
            record: ResourceRecord::new("PCR", "Molecular", "alice", Utc::now()),
            version: "1.0.0".into(),
            steps: Vec::new(),
        }
    }

    #[tokio::test]
    async fn manual_responder_answers_create() {
        let (client, mut receiver) = create_mock_client::<Protocol>(10);

        let create_task = tokio::spawn(async move {
            client.create(ProtocolCreate::new("PCR", "Molecular", "alice")).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.title, "PCR");
        responder.send(Ok(protocol(1))).unwrap();

        let created = create_task.await.unwrap().unwrap();
        assert_eq!(created.id, ProtocolId(1));
    }

    #[tokio::test]
    async fn scripted_responses_are_consumed_in_order() {
        let mock = MockClient::<Protocol>::new();
        mock.expect_get_many().return_ok(ProviderPage {
            data: vec![protocol(1)],
            pagination: PageMeta { total: 1, total_pages: 1 },
        });
        mock.expect_delete().return_err(ProviderError::NotFound("protocol_9".into()));

        let client = mock.client();
        let query = ProviderQuery {
            page: 1,
            limit: 10,
            search: None,
            category: None,
            status: None,
            is_public: None,
            exclude_in_review: None,
        };
        let page = client.get_many(query).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(
            client.delete(ProtocolId(9)).await,
            Err(ProviderError::NotFound("protocol_9".into()))
        );

        mock.verify();
    }
}
