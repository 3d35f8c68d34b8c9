//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for tests or overrides in runtime environments.
//!
//! Every value has a development default, so a bare checkout runs (and tests pass)
//! without a `.env` file.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub verification_code_minutes: i64,
    pub sweep_interval_seconds: u64,
    pub background_workers: usize,
    pub background_queue_capacity: usize,
    pub rate_limit_requests: u32,
    pub rate_limit_window_seconds: u64,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from_name: String,
    pub frontend_url: String,
    pub superadmin_email: String,
    pub superadmin_password: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: string_or("APP_ENV", "development"),
            project_name: string_or("PROJECT_NAME", "campus-attendance"),
            log_level: string_or("LOG_LEVEL", "api=info"),
            log_file: string_or("LOG_FILE", "api.log"),
            log_to_stdout: string_or("LOG_TO_STDOUT", "false") == "true",
            database_path: string_or("DATABASE_PATH", "data/attendance.db"),
            host: string_or("HOST", "127.0.0.1"),
            port: parsed("PORT", 8080),
            jwt_secret: string_or("JWT_SECRET", "dev-secret-change-in-production"),
            access_token_minutes: parsed("ACCESS_TOKEN_MINUTES", 15),
            refresh_token_days: parsed("REFRESH_TOKEN_DAYS", 7),
            verification_code_minutes: parsed("VERIFICATION_CODE_MINUTES", 30),
            sweep_interval_seconds: parsed("SWEEP_INTERVAL_SECONDS", 300),
            background_workers: parsed("BACKGROUND_WORKERS", 4),
            background_queue_capacity: parsed("BACKGROUND_QUEUE_CAPACITY", 256),
            rate_limit_requests: parsed("RATE_LIMIT_REQUESTS", 100),
            rate_limit_window_seconds: parsed("RATE_LIMIT_WINDOW_SECONDS", 60),
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: parsed("SMTP_PORT", 587),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            email_from_name: string_or("EMAIL_FROM_NAME", "Campus Attendance"),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_default(),
            superadmin_email: env::var("SUPERADMIN_EMAIL").unwrap_or_default(),
            superadmin_password: env::var("SUPERADMIN_PASSWORD").unwrap_or_default(),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_access_token_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.access_token_minutes = value);
    }

    pub fn set_refresh_token_days(value: i64) {
        AppConfig::set_field(|cfg| cfg.refresh_token_days = value);
    }

    pub fn set_verification_code_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.verification_code_minutes = value);
    }

    pub fn set_sweep_interval_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.sweep_interval_seconds = value);
    }

    pub fn set_rate_limit_requests(value: u32) {
        AppConfig::set_field(|cfg| cfg.rate_limit_requests = value);
    }

    pub fn set_rate_limit_window_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.rate_limit_window_seconds = value);
    }

    pub fn set_smtp_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.smtp_host = value.into());
    }

    pub fn set_superadmin_credentials(email: impl Into<String>, password: impl Into<String>) {
        AppConfig::set_field(|cfg| {
            cfg.superadmin_email = email.into();
            cfg.superadmin_password = password.into();
        });
    }

    /// True when enough SMTP settings exist to deliver real mail.
    pub fn smtp_enabled(&self) -> bool {
        !self.smtp_host.is_empty() && !self.smtp_username.is_empty()
    }
}

// --- Free accessors used across crates ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn access_token_minutes() -> i64 {
    AppConfig::global().access_token_minutes
}

pub fn refresh_token_days() -> i64 {
    AppConfig::global().refresh_token_days
}

pub fn verification_code_minutes() -> i64 {
    AppConfig::global().verification_code_minutes
}

pub fn sweep_interval_seconds() -> u64 {
    AppConfig::global().sweep_interval_seconds
}
