pub mod pagination;
pub mod users;

use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Largest JSON request body accepted (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// API 错误响应
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    /// 错误信息
    pub message: String,
}

pub fn success_response<T>(status: StatusCode, data: T) -> Response
where
    T: Serialize,
{
    (status, Json(data)).into_response()
}

pub fn error_response(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ApiError {
            message: msg.to_string(),
        }),
    )
        .into_response()
}

pub fn not_found_response() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// 健康检查响应
#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// 服务是否可用
    ok: bool,
}

/// 获取服务健康状态。
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "服务健康状态", body = HealthResponse)
    )
)]
async fn health() -> impl IntoResponse {
    success_response(StatusCode::OK, HealthResponse { ok: true })
}

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .merge(users::user_routes())
}
