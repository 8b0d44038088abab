//! Test Helper Utilities
//!
//! Shared utilities for testing albumrate-gw
#![allow(dead_code)]

pub mod db_utils;
pub mod fake_catalog;

pub use db_utils::{create_test_db, test_app};
pub use fake_catalog::{spawn_fake_catalog, FakeCatalog};
