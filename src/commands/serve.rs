//! `oda serve` — local status page over the collected records.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use clap::Args;

use crate::app::{AppContext, init_tracing};
use crate::commands::shutdown_signal;
use crate::infra::host;
use crate::infra::store::{DB_FILE_NAME, SqliteStore};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Port to serve the status page on
    #[arg(short = 'p', long, default_value_t = 8080)]
    pub port: u16,
}

/// Run `oda serve` until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the port cannot be
/// bound.
pub async fn run(app: &AppContext, args: &ServeArgs) -> Result<()> {
    init_tracing(app.verbose);

    let cfg = host::agent_config(false, false, &[], "serve")?;
    let store = Arc::new(
        SqliteStore::open(&cfg.agent_dir().join(DB_FILE_NAME)).context("opening local store")?,
    );

    let router = axum::Router::new()
        .route("/", get(index))
        .route("/api/commands", get(recent_commands))
        .route("/api/processes", get(recent_processes))
        .with_state(store);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port))
        .await
        .with_context(|| format!("binding port {}", args.port))?;

    app.output.info(&format!(
        "Serving ODA status on http://localhost:{}",
        args.port
    ));

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving status page")?;
    Ok(())
}

async fn index() -> Response {
    match crate::assets::web_asset("index.html") {
        Ok(page) => Html(page).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn recent_commands(State(store): State<Arc<SqliteStore>>) -> Response {
    match store.recent_commands(200) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!("failed to read commands: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn recent_processes(State(store): State<Arc<SqliteStore>>) -> Response {
    match store.recent_processes(200) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!("failed to read processes: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
