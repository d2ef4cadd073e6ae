//! REST API module.
//!
//! Handlers are thin: they bind the request, call one service operation and
//! wrap the result in the response envelope.

mod topics;
mod users;
mod words;

pub use topics::*;
pub use users::*;
pub use words::*;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    fn with_status(status: StatusCode, data: Option<T>) -> Self {
        Self {
            success: true,
            message: "success".to_string(),
            data,
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// 200 with a payload.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::with_status(StatusCode::OK, Some(data)))
}

/// 201 with the created resource.
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::with_status(StatusCode::CREATED, Some(data)))
}

/// 200 without a payload.
pub fn done() -> ApiResult<()> {
    Ok(ApiResponse::with_status(StatusCode::OK, None))
}

/// `axum::Json` whose rejection is rendered as an error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` whose rejection is rendered as an error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// `axum::extract::Query` whose rejection is rendered as an error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
