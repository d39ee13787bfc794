//! Development registration endpoint.
//!
//! `POST /api/fingerprint` accepts a signal set and answers with the
//! registration response the browser client expects. A session cookie
//! carrying the user id is set on success.

use std::sync::Arc;

use apphub_fingerprint::SignalSet;
use apphub_identity::RegistrationResponse;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::registry::Registry;

/// Registration route path.
pub const FINGERPRINT_PATH: &str = "/api/fingerprint";

/// Cookie naming the session's user.
pub const SESSION_COOKIE: &str = "apphub_user";

/// Routes served under `/api`.
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route(FINGERPRINT_PATH, post(register_fingerprint))
        .with_state(registry)
}

async fn register_fingerprint(
    State(registry): State<Arc<Registry>>,
    payload: Result<Json<SignalSet>, JsonRejection>,
) -> Response {
    let signals = match payload {
        Ok(Json(signals)) => signals,
        Err(rejection) => {
            println!("[dev-server] rejected registration: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(RegistrationResponse::failed(rejection.body_text())),
            )
                .into_response();
        }
    };

    let record = registry.register(&signals);
    println!(
        "[dev-server] fingerprint {} -> user {} (new: {})",
        record.fingerprint,
        record.user_id,
        record.is_new_user
    );

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, record.user_id
    );
    (
        [(header::SET_COOKIE, cookie)],
        Json(RegistrationResponse::registered(&record)),
    )
        .into_response()
}
