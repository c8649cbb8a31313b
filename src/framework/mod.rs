//! Generic resource framework.
//!
//! # Main Components
//!
//! - [`CatalogEntity`] - Trait that resource kinds implement
//! - [`ResourceProvider`] - Remote CRUD/query contract the engine talks to
//! - [`ResourceActor`] - In-memory backing service for one kind
//! - [`ResourceClient`] - Type-safe client for the backing service
//! - [`ProviderError`] - Transport and backing-service failures
//!
//! # Testing
//!
//! See [`mock`] module for utilities to drive the engine without a backing service.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod provider;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use entity::CatalogEntity;
pub use error::{FailureKind, ProviderError};
pub use message::{ResourceRequest, Response};
pub use provider::ResourceProvider;
