//! Application state container shared across Axum route handlers and services.
//!
//! Holds the long-lived collaborators: the database connection, the background
//! task queue, the request rate limiter and the notification transport. Each is
//! constructed once at startup and cloned cheaply into handlers.

use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::rate_limit::RateLimiter;
use crate::tasks::TaskQueue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    tasks: TaskQueue,
    limiter: Arc<RateLimiter>,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Creates a new `AppState`, starting the background workers and sizing the
    /// rate limiter from the global configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn Notifier>) -> Self {
        let cfg = AppConfig::global().clone();
        let tasks = TaskQueue::start(cfg.background_workers, cfg.background_queue_capacity);
        let limiter = RateLimiter::new(
            cfg.rate_limit_requests,
            Duration::from_secs(cfg.rate_limit_window_seconds),
        );
        Self::with_parts(db, tasks, Arc::new(limiter), notifier)
    }

    /// Assembles state from explicitly constructed collaborators.
    pub fn with_parts(
        db: DatabaseConnection,
        tasks: TaskQueue,
        limiter: Arc<RateLimiter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            tasks,
            limiter,
            notifier,
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }
}

impl AppState {
    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for background jobs that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn notifier_clone(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }
}
