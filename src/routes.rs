use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, log_server_errors};
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), log_server_errors))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::home::root))
        .route("/health", get(public::home::health))
        .route("/auth/register", post(public::auth::register))
        .route("/auth/token", post(public::auth::token))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{activities, journal, users};

    Router::new()
        .route("/users/:username", get(users::show))
        // Activity calendar
        .route("/users/:username/activities", get(activities::list))
        .route("/users/:username/activities/add", post(activities::create))
        .route(
            "/users/:username/activities/:id",
            get(activities::show)
                .put(activities::update)
                .delete(activities::delete),
        )
        // Journal
        .route("/users/:username/journal", get(journal::list))
        .route("/users/:username/journal/add", post(journal::create))
        .route(
            "/users/:username/journal/:id",
            get(journal::show).put(journal::update).delete(journal::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn fallback() -> ApiError {
    ApiError::not_found("Not Found")
}

/// `*` allows any origin; an empty list allows none
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
