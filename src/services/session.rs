use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::{error::SessionError, models::responses::ApiResponse, models::session::Session};

pub fn session_payload(session: &Session) -> Value {
    json!({
        "session": session,
        "offerUpgrade": session.offer_upgrade(),
    })
}

pub fn error_response(err: SessionError) -> Response {
    let status = match &err {
        SessionError::Validation { .. } => StatusCode::BAD_REQUEST,
        SessionError::NoSession => StatusCode::UNAUTHORIZED,
        SessionError::ExpiryOutOfRange { .. }
        | SessionError::Malformed(_)
        | SessionError::UnsupportedVersion(_)
        | SessionError::Io(_)
        | SessionError::Serialization(_) => {
            tracing::error!("Session operation failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ApiResponse::failure(err.to_string(), u32::from(status.as_u16()))),
    )
        .into_response()
}
