//! Route definitions and router construction.
//!
//! This module defines the HTTP routes and creates the main router.
//! Handlers delegate to the shared `AppCore` facade. Protected handlers take
//! an [`AuthUser`](crate::auth::AuthUser) argument, so public and protected
//! routes can share a path with different methods.

use axum::Router;
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build all API routes without `/api` prefix (for nesting under /api).
///
/// Returns a router typed as `Router<AppState>` but WITHOUT `.with_state()`
/// applied. The caller must apply `.with_state()` before nesting.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/add_user", post(handlers::accounts::register))
        .route("/verify_login", post(handlers::accounts::login))
        .route("/logout", post(handlers::accounts::logout))
        .route("/get_user_profile", get(handlers::accounts::profile))
        .route("/me", get(handlers::accounts::me))
        // Bounties
        .route("/create_bounty", post(handlers::bounties::create))
        .route("/search_bounties", get(handlers::bounties::search))
        .route("/get_bounty_details", get(handlers::bounties::details))
        .route("/get_user_bounties", get(handlers::bounties::user_bounties))
        .route("/identify_plant", post(handlers::bounties::identify))
        .route("/submit_bounty", post(handlers::bounties::submit))
        .route("/verify_submission", post(handlers::bounties::verify))
        .route("/leaderboard", get(handlers::bounties::leaderboard))
        // Projects
        .route(
            "/projects",
            get(handlers::projects::list).post(handlers::projects::create),
        )
        .route("/projects/nearby", get(handlers::projects::nearby))
        .route("/projects/{id}", get(handlers::projects::get))
        .route("/update_project", post(handlers::projects::update))
        .route("/projects/{id}/join", post(handlers::projects::join))
        .route("/upload_picture", post(handlers::projects::upload_picture))
        .route(
            "/projects/{id}/locations",
            get(handlers::projects::list_locations).post(handlers::projects::add_location),
        )
        .route(
            "/projects/{id}/messages",
            get(handlers::projects::list_messages).post(handlers::projects::post_message),
        )
        // Datasets
        .route("/project_data/{id}", get(handlers::datasets::project_data))
        .route(
            "/project_datasets/{id}",
            get(handlers::datasets::project_datasets),
        )
        .route("/download_data/{id}", get(handlers::datasets::download_data))
        .route(
            "/download_dataset/{id}/{dataset_id}",
            get(handlers::datasets::download_dataset),
        )
        .route(
            "/download_all_data/{id}",
            get(handlers::datasets::download_all_data),
        )
        .route(
            "/project_visualization/{id}",
            get(handlers::datasets::visualization),
        )
        // Events
        .route("/create_event", post(handlers::events::create))
        .route("/events", get(handlers::events::list))
        .route("/events/{id}", get(handlers::events::get))
        .route("/events/{id}/attend", post(handlers::events::attend))
        .route(
            "/events/{id}/options",
            get(handlers::events::options).post(handlers::events::propose_option),
        )
        .route("/events/{id}/votes", post(handlers::events::vote))
        .route("/events/{id}/best", get(handlers::events::best))
        .route(
            "/events/{id}/rides",
            get(handlers::events::list_rides).post(handlers::events::offer_ride),
        )
        .route(
            "/events/{id}/rides/{ride_id}/join",
            post(handlers::events::join_ride),
        )
        .route(
            "/events/{id}/rides/{ride_id}/leave",
            post(handlers::events::leave_ride),
        )
        // Payouts
        .route(
            "/create_cashout_intent",
            post(handlers::payouts::create_cashout_intent),
        )
        .route(
            "/process_withdrawal",
            post(handlers::payouts::process_withdrawal),
        )
        .route("/get_withdraw_history", get(handlers::payouts::history))
        .route("/issue_card", post(handlers::payouts::issue_card))
        .route("/cards", get(handlers::payouts::list_cards))
        // Assistant
        .route("/ask_chatgpt", post(handlers::assistant::ask))
}

/// Create the main router with all API routes.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes().with_state(state).layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// Create a router with API routes and static asset serving.
///
/// API routes and `/health` take priority; other paths are served from
/// `static_dir`, falling back to `index.html` for client-side routing.
///
/// # Example
/// ```ignore
/// let router = create_spa_router(ctx, "./dist", &CorsConfig::AllowAll);
/// ```
pub fn create_spa_router<P: AsRef<Path>>(
    ctx: AxumContext,
    static_dir: P,
    cors_config: &CorsConfig,
) -> Router {
    let static_path = static_dir.as_ref();
    let index_path = static_path.join("index.html");

    let serve_dir = ServeDir::new(static_path).fallback(ServeFile::new(&index_path));

    create_router(ctx, cors_config).fallback_service(serve_dir)
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
