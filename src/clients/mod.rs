//! Kind-specific wrappers around [`CatalogClient`](crate::engine::CatalogClient).

pub mod catalog_handle;
pub mod protocol_catalog;
pub mod report_catalog;

pub use catalog_handle::*;
pub use protocol_catalog::*;
pub use report_catalog::*;
