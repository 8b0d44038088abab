//! Connection pool monitoring
//!
//! Wraps the SQLite pool so every store call acquires its connection through
//! one place: acquisition wait and hold time are logged, and the number of
//! tasks queued for a connection is tracked for `/health`.

use albumrate_common::Result;
use serde::Serialize;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Pool occupancy snapshot reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Open connections (idle + in use)
    pub total: u32,
    pub idle: usize,
    /// Tasks currently waiting to acquire a connection
    pub waiting: usize,
}

/// Owned handle to the connection pool
#[derive(Clone)]
pub struct MonitoredPool {
    pool: SqlitePool,
    waiting: Arc<AtomicUsize>,
}

impl MonitoredPool {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            waiting: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Acquire a connection, queueing up to the pool's acquire timeout
    pub async fn acquire(&self, caller: &'static str) -> Result<MonitoredConnection> {
        let start = Instant::now();
        tracing::debug!(caller, "Connection acquisition requested");

        let conn = {
            let _waiting = WaitingGuard::enter(&self.waiting);
            self.pool.acquire().await?
        };

        let wait_ms = start.elapsed().as_millis();
        if wait_ms > 1000 {
            tracing::warn!(
                caller,
                wait_ms,
                "SLOW CONNECTION ACQUISITION - Pool may be saturated (all connections in use)"
            );
        } else if wait_ms > 500 {
            tracing::info!(caller, wait_ms, "Connection acquisition slower than expected (>500ms)");
        } else {
            tracing::debug!(caller, wait_ms, "Connection acquired");
        }

        Ok(MonitoredConnection {
            conn,
            caller,
            acquired_at: Instant::now(),
        })
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total: self.pool.size(),
            idle: self.pool.num_idle(),
            waiting: self.waiting.load(Ordering::SeqCst),
        }
    }

    /// Close the pool, waiting for checked-out connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

/// Decrements the waiting counter even if the acquiring future is dropped
struct WaitingGuard<'a>(&'a AtomicUsize);

impl<'a> WaitingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Pooled connection that logs how long it was held when returned
pub struct MonitoredConnection {
    conn: PoolConnection<Sqlite>,
    caller: &'static str,
    acquired_at: Instant,
}

impl Deref for MonitoredConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        &self.conn
    }
}

impl DerefMut for MonitoredConnection {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl Drop for MonitoredConnection {
    fn drop(&mut self) {
        let held_ms = self.acquired_at.elapsed().as_millis();
        if held_ms > 2000 {
            tracing::warn!(
                caller = self.caller,
                held_ms,
                "LONG HOLD - Connection held for extended period, may contribute to pool saturation"
            );
        } else {
            tracing::debug!(caller = self.caller, held_ms, "Connection released");
        }
    }
}
