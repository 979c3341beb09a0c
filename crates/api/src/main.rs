use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use conference_api::config::ServerConfig;
use conference_api::router::build_app_router;
use conference_api::state::AppState;
use conference_events::{
    AnnouncementScheduler, Cache, EmailConfig, EmailDelivery, Mailer, TaskQueue, TaskWorker,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conference_api=debug,conference_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = conference_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    conference_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    conference_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Mailer ---
    let mailer: Option<Arc<dyn Mailer>> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(host = %email_config.smtp_host, "SMTP delivery enabled");
            Some(Arc::new(EmailDelivery::new(email_config)))
        }
        None => {
            tracing::info!("SMTP_HOST not set, confirmation e-mails will be skipped");
            None
        }
    };

    // --- Task worker ---
    let cache = Arc::new(Cache::new());
    let (tasks, task_receiver) = TaskQueue::new();
    let worker = TaskWorker::new(pool.clone(), Arc::clone(&cache), mailer);
    let worker_handle = tokio::spawn(worker.run(task_receiver));

    // --- Announcement scheduler ---
    let scheduler_cancel = tokio_util::sync::CancellationToken::new();
    let scheduler = AnnouncementScheduler::new(
        tasks.clone(),
        Duration::from_secs(config.announcement_refresh_secs),
    );
    let scheduler_handle = tokio::spawn(scheduler.run(scheduler_cancel.clone()));

    tracing::info!("Background services started (task worker, announcement scheduler)");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache,
        tasks,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    // The scheduler holds a queue handle; stop it first so the worker can drain.
    scheduler_cancel.cancel();
    let _ = tokio::time::timeout(shutdown_timeout, scheduler_handle).await;
    tracing::info!("Announcement scheduler stopped");

    // The router (and with it the last queue handle) was dropped by `serve`.
    if tokio::time::timeout(shutdown_timeout, worker_handle)
        .await
        .is_err()
    {
        tracing::warn!("Task worker did not drain before the shutdown timeout");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
