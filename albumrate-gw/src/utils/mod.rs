//! Utility modules for albumrate-gw

pub mod pool_monitor;

pub use pool_monitor::{MonitoredConnection, MonitoredPool, PoolStats};
