//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Joined `FromRow` projections used by list and detail endpoints
//! - `Deserialize` create DTOs for inserts, and update DTOs where rows are
//!   mutable (all `Option` fields)
//!
//! Foreign keys serialize under the name of the referenced entity
//! (`group`, `photocard`, ...) to match the request payloads.

pub mod album;
pub mod collectible;
pub mod favorite;
pub mod group;
pub mod lightstick;
pub mod member;
pub mod photocard;
pub mod session;
pub mod stats;
pub mod user;
pub mod wishlist;
