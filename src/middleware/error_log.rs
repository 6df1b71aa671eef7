use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::config::Environment;
use crate::error::ServerErrorDetail;
use crate::state::AppState;

/// Logs the server-side cause of 5xx responses. Test runs stay quiet.
pub async fn log_server_errors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    if let Some(detail) = loggable_detail(&response, state.config.environment) {
        tracing::error!("{} {} -> {}: {}", method, path, response.status(), detail.0);
    }

    response
}

fn loggable_detail(response: &Response, environment: Environment) -> Option<&ServerErrorDetail> {
    if environment == Environment::Test {
        return None;
    }
    response.extensions().get::<ServerErrorDetail>()
}
