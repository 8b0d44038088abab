//! External service clients

pub mod catalog_client;

pub use catalog_client::{AlbumDetail, CatalogClient, CatalogError, Release};
