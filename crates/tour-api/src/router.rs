// ============================================================================
// Tour API - Router
// File: crates/tour-api/src/router.rs
// ============================================================================

use std::any::Any;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyHeader, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{error, warn};

use crate::handlers;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let auth_routes = Router::new()
        .route("/register-tourist", post(handlers::auth::register_tourist))
        .route("/login", post(handlers::auth::login));

    let tour_routes = Router::new()
        .route("/", post(handlers::tour::create_tour))
        .route("/my", get(handlers::tour::my_tours))
        .route("/published", get(handlers::tour::published_tours))
        .route("/{tourId}", get(handlers::tour::get_tour))
        .route("/{tourId}/key-points", post(handlers::tour::add_key_point))
        .route("/{tourId}/publish", post(handlers::tour::publish_tour));

    let replacement_routes = Router::new()
        .route("/", get(handlers::replacement::replacement_tours))
        .route("/request/{tourId}", post(handlers::replacement::request_replacement))
        .route("/cancel/{tourId}", post(handlers::replacement::cancel_replacement))
        .route("/take/{tourId}", post(handlers::replacement::take_over));

    let cart_routes = Router::new()
        .route("/", get(handlers::cart::get_cart))
        .route("/add", post(handlers::cart::add_to_cart))
        .route("/remove", post(handlers::cart::remove_from_cart));

    let purchase_routes = Router::new()
        .route("/confirm", post(handlers::purchase::confirm_purchase))
        .route("/my", get(handlers::purchase::my_purchases));

    let rating_routes = Router::new()
        .route("/", post(handlers::rating::create_rating))
        .route("/tour/{tourId}", get(handlers::rating::ratings_for_tour))
        .route("/tour/{tourId}/average", get(handlers::rating::average_rating));

    let problem_routes = Router::new()
        .route("/", post(handlers::problem::create_problem))
        .route("/in-review", get(handlers::problem::problems_in_review))
        .route("/tour/{tourId}", get(handlers::problem::problems_for_tour))
        .route("/{id}", get(handlers::problem::get_problem))
        .route("/{id}/events", get(handlers::problem::problem_events))
        .route("/{id}/resolve", post(handlers::problem::resolve))
        .route("/{id}/review", post(handlers::problem::send_to_review))
        .route("/{id}/reject", post(handlers::problem::reject))
        .route("/{id}/reopen", post(handlers::problem::reopen));

    let admin_routes = Router::new()
        .route("/blocked-users", get(handlers::admin::blocked_users))
        .route("/unblock/{username}", post(handlers::admin::unblock_user));

    let job_routes = Router::new()
        .route("/cancel-unreplaced-tours", post(handlers::background_job::cancel_unreplaced_tours))
        .route("/send-reminders", post(handlers::background_job::send_reminders))
        .route("/run-all", post(handlers::background_job::run_all));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/tour", tour_routes)
        .nest("/api/replacement", replacement_routes)
        .nest("/api/cart", cart_routes)
        .nest("/api/purchase", purchase_routes)
        .nest("/api/rating", rating_routes)
        .nest("/api/problem", problem_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/backgroundjob", job_routes)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(cors_origin))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AnyHeader);

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            warn!("Invalid CORS origin '{}': {}. Cross-origin requests will be refused.", origin, e);
            layer
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(
            "INTERNAL_ERROR",
            "An unexpected error occurred.",
        )),
    )
        .into_response()
}
