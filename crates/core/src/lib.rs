//! Domain logic shared by the API, the repository layer and the seed tool.
//!
//! Nothing in this crate performs I/O.

pub mod catalog;
pub mod collectible;
pub mod error;
pub mod listing;
pub mod pagination;
pub mod stats;
pub mod types;
