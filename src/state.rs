use std::time::Duration;

use crate::db::DbPool;

/// Handed to every handler through axum `State`. Cloning shares the pool.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(pool: DbPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}
