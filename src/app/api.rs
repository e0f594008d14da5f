use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app::state::AppState,
    config::GlobalConfig,
    routes::{
        event::sse_handler,
        health::health_check,
        session::{activate_subscription, get_session, login, request_otp},
        view::get_view,
    },
};

#[derive(Clone)]
pub struct AppContext {
    pub state: AppState,
    pub config: GlobalConfig,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Kirana Session API", version = "1.0.0"),
    paths(
        crate::routes::health::health_check,
        crate::routes::event::sse_handler,
        crate::routes::session::request_otp,
        crate::routes::session::login,
        crate::routes::session::get_session,
        crate::routes::session::activate_subscription,
        crate::routes::view::get_view,
    ),
    components(schemas(
        crate::models::responses::ApiResponse,
        crate::models::requests::LoginRequest,
        crate::models::session::Session,
        crate::models::session::SessionStatus,
        crate::models::view::View,
        crate::models::view::Screen,
    ))
)]
struct ApiDoc;

pub fn create_api_router(context: AppContext) -> Router {
    let origins: Vec<HeaderValue> = context
        .config
        .server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::CACHE_CONTROL,
        ])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health_check))
        .route("/events", get(sse_handler))
        .route("/login/otp", post(request_otp))
        .route("/login", post(login))
        .route("/session", get(get_session))
        .route("/subscription/activate", post(activate_subscription))
        .route("/views/{view}", get(get_view))
        .merge(SwaggerUi::new("/swagger-ui").url("/docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(context)
}
