//! HTTP handlers

pub mod health;
pub mod auth;
pub mod tour;
pub mod cart;
pub mod purchase;
pub mod rating;
pub mod problem;
pub mod replacement;
pub mod admin;
pub mod background_job;

use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::response::ApiResponse;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub(crate) fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
