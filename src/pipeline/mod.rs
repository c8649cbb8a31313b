//! Local filter → sort → paginate pipeline for client-paginated screens.

pub mod filter;
pub mod paginate;
pub mod sort;
pub mod view;

pub use filter::*;
pub use paginate::*;
pub use sort::*;
pub use view::*;
