//! View Store: named partitions of one resource collection.

pub mod partition;
pub mod view_store;

pub use partition::*;
pub use view_store::*;
