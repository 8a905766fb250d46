pub mod account;
pub mod auth;
pub mod catalog;
pub mod collection;
pub mod favorites;
pub mod index;
pub mod wishlist;
