use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    app::api::AppContext,
    models::{requests::LoginRequest, responses::ApiResponse, view::Screen},
    services::session::{error_response, session_payload},
};

#[utoipa::path(
    post,
    path = "/login/otp",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "OTP sent", body = ApiResponse),
        (status = 400, description = "Invalid mobile number", body = ApiResponse)
    )
)]
pub async fn request_otp(
    State(context): State<AppContext>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    match context.state.sessions.request_otp(&request.mobile_number) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                "OTP sent.",
                json!({ "otpSent": true }),
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Trial session started", body = ApiResponse),
        (status = 400, description = "Invalid mobile number", body = ApiResponse),
        (status = 500, description = "Session could not be stored", body = ApiResponse)
    )
)]
pub async fn login(
    State(context): State<AppContext>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    match context.state.sessions.login(&request.mobile_number).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                "Trial started.",
                session_payload(&session),
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/session",
    tag = "Session",
    responses(
        (status = 200, description = "Current session", body = ApiResponse),
        (status = 401, description = "Not logged in", body = ApiResponse)
    )
)]
pub async fn get_session(State(context): State<AppContext>) -> impl IntoResponse {
    match context.state.sessions.current().await {
        Ok(Some(session)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                "Session fetched.",
                session_payload(&session),
            )),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::failure("No active session", 401)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/subscription/activate",
    tag = "Subscription",
    responses(
        (status = 200, description = "Premium activated", body = ApiResponse),
        (status = 401, description = "Not logged in", body = ApiResponse)
    )
)]
pub async fn activate_subscription(State(context): State<AppContext>) -> impl IntoResponse {
    match context.state.sessions.activate_premium().await {
        Ok(session) => {
            let mut data = session_payload(&session);
            data["nextView"] = json!(Screen::Dashboard);

            (
                StatusCode::OK,
                Json(ApiResponse::success("Premium activated.", data)),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
