//! HTTP surface. Handlers authenticate the caller, hand the store call to
//! a blocking thread and map `StoreError` into `ServerError`.

mod admin;
mod chats;
mod engine;
mod me;
mod points;


use std::sync::{Arc, Mutex};

use axum::{
    http::{HeaderMap, Method},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use kissorslap_store::{Database, User};

use crate::auth::subject_from_headers;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub rate_limiter: RateLimiter,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            rate_limiter: RateLimiter::from_config(&config),
            config: Arc::new(config),
        }
    }

    /// Run `f` against the store on the blocking pool.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, ServerError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> kissorslap_store::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut guard = db
                .lock()
                .map_err(|_| ServerError::Internal("database mutex poisoned".into()))?;
            f(&mut *guard).map_err(ServerError::from)
        })
        .await
        .map_err(|e| ServerError::Internal(format!("store task failed: {e}")))?
    }

    /// The authenticated caller, created with the starting balance on first
    /// sight.
    pub async fn current_user(&self, headers: &HeaderMap) -> Result<User, ServerError> {
        let subject = subject_from_headers(headers)?;
        let starting_points = self.config.starting_points;
        self.with_db(move |db| db.ensure_user(&subject, starting_points))
            .await
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/me", get(me::get_me))
        .route("/me/username", put(me::set_username))
        .route("/me/profile", put(me::update_profile))
        .route("/me/complete", post(me::complete_onboarding))
        .route("/candidates", get(engine::list_candidates))
        .route("/candidates/:user_id/pass", post(engine::pass_candidate))
        .route(
            "/interactions",
            get(engine::list_interactions).post(engine::submit_interaction),
        )
        .route("/interactions/:id", get(engine::get_interaction))
        .route("/chats", get(chats::list_chats))
        .route(
            "/chats/:chat_id/messages",
            get(chats::list_messages).post(chats::send_message),
        )
        .route("/leaderboard", get(points::leaderboard))
        .route("/points/withdraw", post(points::withdraw))
        .route("/admin/credit-points", post(admin::credit_points))
        .route("/admin/adjust-scores", post(admin::adjust_scores))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
