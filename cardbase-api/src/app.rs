/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use cardbase_api::{app::AppState, config::Config};
/// use cardbase_ai::HttpAiBackend;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let ai = Arc::new(HttpAiBackend::from_env());
/// let state = AppState::new(pool, config, ai);
/// let app = cardbase_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    routing::{get, post},
    Router,
};
use cardbase_shared::{ai::AiBackend, auth::middleware::jwt_auth_middleware};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The pool
/// and the AI client are the only shared in-process state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// AI service client
    pub ai: Arc<dyn AiBackend>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, ai: Arc<dyn AiBackend>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            ai,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// ├── /auth/                           # Login flow (public)
/// │   ├── GET  /github                 # Redirect to GitHub
/// │   ├── GET  /github/callback        # OAuth callback, issues token
/// │   └── POST /logout
/// └── /api/                            # Authenticated API
///     ├── GET    /me
///     ├── POST   /projects             GET /projects?q=
///     ├── GET    /projects/:id         PUT/DELETE /projects/:id
///     ├── POST   /projects/:id/reclassify
///     ├── GET    /projects/:id/tags    GET /projects/:id/categories
///     ├── POST   /cards                GET /cards?project_id=
///     ├── GET    /cards/:id            PUT/DELETE /cards/:id
///     ├── POST   /documents            GET /documents?project_id=
///     └── GET    /documents/:id        PUT/DELETE /documents/:id
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Login flow (public, no auth required)
    let auth_routes = Router::new()
        .route("/github", get(routes::auth::github_login))
        .route("/github/callback", get(routes::auth::github_callback))
        .route("/logout", post(routes::auth::logout));

    // Authenticated API
    let api_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .route(
            "/projects",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/:id/reclassify",
            post(routes::projects::reclassify_project),
        )
        .route("/projects/:id/tags", get(routes::projects::project_tags))
        .route(
            "/projects/:id/categories",
            get(routes::projects::project_categories),
        )
        .route(
            "/cards",
            post(routes::cards::create_card).get(routes::cards::list_cards),
        )
        .route(
            "/cards/:id",
            get(routes::cards::get_card)
                .put(routes::cards::update_card)
                .delete(routes::cards::delete_card),
        )
        .route(
            "/documents",
            post(routes::documents::create_document).get(routes::documents::list_documents),
        )
        .route(
            "/documents/:id",
            get(routes::documents::get_document)
                .put(routes::documents::update_document)
                .delete(routes::documents::delete_document),
        )
        .layer(axum::middleware::from_fn({
            let secret = state.config.jwt.secret.clone();
            move |req, next| jwt_auth_middleware(secret.clone(), req, next)
        }));

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
