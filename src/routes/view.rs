use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    app::api::AppContext,
    models::{
        responses::ApiResponse,
        view::{Screen, View},
    },
    services::session::error_response,
};

#[utoipa::path(
    get,
    path = "/views/{view}",
    tag = "View",
    params(
        ("view" = View, Path, description = "Requested view, e.g. DASHBOARD")
    ),
    responses(
        (status = 200, description = "Screen to render for the requested view", body = ApiResponse)
    )
)]
pub async fn get_view(
    State(context): State<AppContext>,
    Path(requested): Path<View>,
) -> impl IntoResponse {
    match context.state.sessions.select_view(requested).await {
        Ok(screen) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                "View resolved.",
                json!({
                    "requested": requested,
                    "screen": screen,
                    "forced": screen != Screen::from(requested),
                }),
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
