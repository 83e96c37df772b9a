//! HTTP request handlers.

pub mod auth;
pub mod categories;
pub mod contacts;
pub mod media;
pub mod products;
pub mod profile;
