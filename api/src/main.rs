use api::auth::middleware::log_request;
use api::routes::routes;
use axum::{Router, http::header::CONTENT_TYPE, middleware::from_fn};
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use services::{email, sweeper, users};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::{
    config::{self, AppConfig},
    state::AppState,
};

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    // Database and schema
    let db = db::connect().await.expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let (admin_email, admin_password) = {
        let cfg = AppConfig::global();
        (cfg.superadmin_email.clone(), cfg.superadmin_password.clone())
    };
    if let Err(e) = users::ensure_superadmin(&db, &admin_email, &admin_password, Utc::now()).await {
        tracing::error!(error = %e, "Superadmin bootstrap failed");
    }

    // Set up dependencies
    let notifier = email::notifier_from_config(&AppConfig::global());
    let app_state = AppState::new(db, notifier);

    // Keep event statuses in step with the clock
    let _sweeper = sweeper::spawn(&app_state);

    // Configure middleware
    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_TYPE]);

    // Build app router
    let app = Router::new()
        .nest("/api", routes(app_state))
        .layer(from_fn(log_request))
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    tracing::info!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
