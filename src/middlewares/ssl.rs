use axum::{
    extract::{Request, State},
    http::{
        header::{HOST, LOCATION},
        StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// In production, redirects plain-HTTP requests (as reported by the proxy) to HTTPS
pub async fn force_ssl(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.config.environment.is_production() {
        return next.run(request).await;
    }

    let is_https = request
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    if is_https {
        return next.run(request).await;
    }

    let Some(host) = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
    else {
        return next.run(request).await;
    };

    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let location = format!("https://{}{}", host, path);

    (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response()
}
