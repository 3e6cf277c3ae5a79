//! SQLite connection wrapper shared by CLI commands and background workers.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How long a writer waits for another process holding the write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::configure(conn)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> AppResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        func(&mut self.conn)
    }

    pub fn into_shared(self) -> SharedPool {
        SharedPool(Arc::new(Mutex::new(self)))
    }
}

/// Cloneable handle used by the workers; every use runs on a blocking thread.
#[derive(Clone)]
pub struct SharedPool(Arc<Mutex<DbPool>>);

impl SharedPool {
    pub fn lock(&self) -> AppResult<MutexGuard<'_, DbPool>> {
        self.0
            .lock()
            .map_err(|_| AppError::Other("database handle poisoned".into()))
    }

    /// Run `func` against the connection on tokio's blocking pool.
    pub async fn run<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = pool.lock()?;
            guard.with_conn(func)
        })
        .await
        .map_err(|e| AppError::Worker(e.to_string()))?
    }
}
