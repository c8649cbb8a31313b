//! The partitioned query-and-mutation engine.
//!
//! - [`FetchOrchestrator`] - debounce and generation tagging per partition
//! - [`coordinator`] - write planning and reconciliation
//! - [`CatalogActor`] / [`CatalogClient`] - the task that owns a catalog's
//!   views, and the handle the UI talks to

pub mod actor;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod message;
pub mod orchestrator;

pub use actor::{CatalogActor, CatalogContext};
pub use client::CatalogClient;
pub use coordinator::{default_membership, toggle_archive, DuplicatePlacement, Mutation, MutationKind};
pub use error::CatalogError;
pub use message::{CatalogRequest, Response};
pub use orchestrator::{FetchOrchestrator, FetchTicket, Settle};
