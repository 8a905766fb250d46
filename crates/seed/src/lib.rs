//! Catalog population from a JSON fixture.
//!
//! The catalog is read-only over the API; this crate is how groups, members,
//! albums, photocards and lightsticks get into the database.

pub mod fixture;
pub mod loader;
