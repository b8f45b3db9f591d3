#[cfg(test)]
#[path = "server_test.rs"]
mod tests;

pub mod admin;
pub mod auth;
pub mod handlers;
pub mod pages;
pub mod response;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use chrono::TimeDelta;
use eyre::{Context, Result, eyre};
use tokio_util::sync::CancellationToken;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;

use crate::config::{AuthConfig, ServerConfig};
use crate::render::Renderer;
use crate::services::{IngestService, SearchService, TranscriptService};
use crate::storage::ArcStorage;

pub use auth::SessionStore;

pub const ADMIN_PATH: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";

/// Shared by every handler. Cloning is cheap, all members are handles.
#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestService,
    pub transcripts: TranscriptService,
    pub search: SearchService,
    pub sessions: SessionStore,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(storage: ArcStorage, renderer: Renderer, auth: AuthConfig) -> Result<Self> {
        let ttl = i64::try_from(auth.session_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| eyre!("session ttl {}s is out of range", auth.session_ttl_secs))?;

        Ok(Self {
            ingest: IngestService::new(storage.clone()),
            transcripts: TranscriptService::new(storage.clone(), renderer),
            search: SearchService::new(storage),
            sessions: SessionStore::new(ttl),
            auth: Arc::new(auth),
        })
    }
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let ingest = Router::new()
        .route("/api/ticket", post(handlers::ingest_ticket))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_secret,
        ))
        .layer(DefaultBodyLimit::max(config.max_body_bytes));

    let admin = Router::new()
        .route(ADMIN_PATH, get(admin::listing))
        .route("/admin/api/tickets", get(admin::list_tickets))
        .route("/admin/logout", get(admin::logout).post(admin::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let mut router = Router::new()
        .route("/", get(handlers::health))
        .route(LOGIN_PATH, get(admin::login_page).post(admin::login))
        .route("/:transcript_id", get(handlers::view_transcript))
        .merge(ingest)
        .merge(admin)
        .layer(middleware::from_fn(log_request))
        .layer(CookieManagerLayer::new())
        .with_state(state);

    if config.cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} {}ms",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Serves until `shutdown` is cancelled, then lets in-flight requests finish.
pub async fn serve(config: &ServerConfig, state: AppState, shutdown: CancellationToken) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .wrap_err(format!("binding {}", config.bind))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state, config))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .wrap_err("serving http")?;

    log::info!("Server stopped");
    Ok(())
}
