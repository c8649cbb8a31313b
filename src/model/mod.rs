//! Pure data structures implementing the [`CatalogEntity`](crate::framework::CatalogEntity) trait.

pub mod protocol;
pub mod record;
pub mod report;
pub mod status;

pub use protocol::*;
pub use record::*;
pub use report::*;
pub use status::*;
