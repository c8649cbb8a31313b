//! QuerySpec builder: raw UI filter state in, canonical provider query out.

pub mod filter;
pub mod spec;
pub mod wire;

pub use filter::*;
pub use spec::*;
pub use wire::*;
