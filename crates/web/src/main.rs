//! BookBazaar, an online bookstore.
//!
//! Serves the catalog, carts, checkout, and the per-role dashboards on
//! port 5000 by default. State is in-memory; set `BOOKBAZAAR_SEED=true`
//! to load the demo catalog and accounts on boot.

#![cfg_attr(not(test), forbid(unsafe_code))]

use book_bazaar_web::config::AppConfig;
use book_bazaar_web::state::AppState;
use book_bazaar_web::{app, seed};

#[tokio::main]
async fn main() {
    // .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "book_bazaar_web=info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env().expect("Failed to load configuration");
    let addr = config.socket_addr().expect("Invalid bind address");
    let seed_on_boot = config.seed;

    let state = AppState::new(config);
    if seed_on_boot {
        seed::seed_demo_data(state.store())
            .await
            .expect("Failed to seed demo data");
    }

    let app = app(state);

    tracing::info!("bookbazaar listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
