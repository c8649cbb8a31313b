//! # Catalog Engine
//!
//! > **Partitioned resource query-and-mutation for a lab catalog dashboard.**
//!
//! This crate keeps the list screens of a lab dashboard (protocols, reports)
//! in sync with a remote resource provider. Each catalog holds several
//! *partitions* of the same resource kind ("public", "mine", "recent"),
//! turns raw filter input into debounced provider queries, and applies
//! confirmed writes to every partition that should see them.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why an Actor per Catalog?
//!
//! A catalog's state is touched from three directions at once: user input,
//! provider responses arriving in any order, and debounce timers. Giving that
//! state to a single task removes every lock and makes the ordering rules
//! easy to state:
//! - **Last query wins**: every dispatched fetch carries a generation; older
//!   responses are discarded when they settle.
//! - **Server confirms first**: the store changes only after the provider
//!   returns the saved entity. There is no optimistic update to roll back.
//! - **Readers never wait**: each change publishes an immutable
//!   [`CatalogSnapshot`](store::CatalogSnapshot) on a `watch` channel.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: The Power of `T`
//! You'll see `CatalogActor<T: CatalogEntity>` everywhere. The fetch, debounce
//! and reconcile logic is written once and works for every resource kind that
//! exposes the shared [`ResourceRecord`](model::ResourceRecord) header.
//!
//! ### Mocking: Testing without Pain
//! The engine only talks to a [`ResourceProvider`](framework::ResourceProvider).
//! See the [`framework::mock`] module for scripted and hand-driven providers.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Provider failures are classified by [`ProviderError`](framework::ProviderError).
//! Write paths return [`CatalogError`](engine::CatalogError) so a dialog can
//! decide whether to stay open. Read paths never fail; they report through the
//! [`Notifier`](notify::Notifier) and keep the last good data.
//!
//! ### 2. Async Context Injection
//! The provider and notifier are injected when the engine starts (`run(ctx)`),
//! not at construction time, so the same engine runs against the in-memory
//! service, a mock, or a remote client.
//!
//! ### 3. Observability
//! `tracing` is used throughout with structured fields (`entity_type`,
//! `partition`, `generation`). See [`lifecycle::setup_tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Query Path ([`query`], [`pipeline`])
//! - **Role**: Normalize raw filter state into a canonical query, and run the
//!   same filter, sort and paginate steps locally for bounded windows.
//! - **Key items**: [`build_query`](query::build_query), [`LocalView`](pipeline::LocalView).
//!
//! ### 2. The View Store ([`store`])
//! - **Role**: Partition contents, pagination and loading flags, plus the
//!   cross-partition upsert and remove operations.
//!
//! ### 3. The Engine ([`engine`])
//! - **Role**: Fetch orchestration (debounce, generations) and the mutation
//!   coordinator, driven by one [`CatalogActor`](engine::CatalogActor) per catalog.
//!
//! ### 4. The Provider Seam ([`framework`])
//! - **Role**: The [`ResourceProvider`](framework::ResourceProvider) contract and
//!   an in-memory [`ResourceActor`](framework::ResourceActor) backing service.
//!
//! ### 5. The Interface ([`clients`], [`protocols`], [`reports`])
//! - **Role**: Kind-specific catalogs with the list-screen callbacks.
//! - **Key items**: [`ProtocolCatalog`](clients::ProtocolCatalog), [`ReportCatalog`](clients::ReportCatalog).
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! - **Role**: Configuration, wiring and graceful shutdown.
//! - **Key items**: [`LabDashboard`](lifecycle::LabDashboard), [`EngineConfig`](lifecycle::EngineConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod engine;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod protocols;
pub mod query;
pub mod reports;
pub mod store;
