use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{app::api::AppContext, models::responses::ApiResponse};

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is healthy", body = ApiResponse),
    )
)]
pub async fn health_check(State(context): State<AppContext>) -> impl IntoResponse {
    let policy = context.state.sessions.policy();
    let data = json!({
        "status": "healthy",
        "persistentStore": context.config.session.store_dir.is_some(),
        "trialDays": policy.trial_days,
        "premiumDays": policy.premium_days,
        "timestamp": context.state.clock.now()
    });

    (
        StatusCode::OK,
        Json(ApiResponse::success("Server is healthy.", data)),
    )
        .into_response()
}
