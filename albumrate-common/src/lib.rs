//! # albumrate common library
//!
//! Shared code for the albumrate workspace:
//! - Error type used by the stores and the gateway
//! - Configuration model and TOML loading
//! - Database bootstrap (pool options, schema creation)
//! - Persisted record models

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
