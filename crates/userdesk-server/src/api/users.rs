use crate::api::pagination::ListUsersParams;
use crate::api::{error_response, not_found_response, success_response, ApiError};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use userdesk_common::types::{CreateUserRequest, UpdateUserRequest, User};
use userdesk_storage::StorageError;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// 用户分页列表
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    /// 当前页数据（按创建时间倒序）
    pub data: Vec<User>,
    /// 匹配总数（分页前）
    pub total: u64,
    /// 当前页码
    pub page: u64,
    /// 每页条数
    pub page_size: u64,
}

/// Ids that do not parse are treated like ids that do not exist.
fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Oversized bodies keep their 413; every other unreadable body is a 400.
fn bad_body_response(rejection: JsonRejection) -> Response {
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, &rejection.body_text())
}

fn storage_failure(trace_id: &str, action: &'static str, err: StorageError) -> Response {
    match err {
        StorageError::Validation(msg) | StorageError::Constraint(msg) => {
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
        StorageError::NotFound { .. } => not_found_response(),
        StorageError::Database(e) => {
            tracing::error!(trace_id = %trace_id, error = %e, action, "Storage failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

/// 创建用户。
/// `role` 缺省或为空时为 `user`。
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "用户已创建", body = User),
        (status = 400, description = "缺少字段、格式错误或邮箱重复", body = ApiError),
        (status = 413, description = "请求体过大", body = ApiError),
        (status = 500, description = "存储异常", body = ApiError)
    )
)]
async fn create_user(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_body_response(rejection),
    };
    let Some(new_user) = req.into_new_user() else {
        return error_response(StatusCode::BAD_REQUEST, "name and email are required");
    };

    match state.users.create(&new_user).await {
        Ok(user) => {
            tracing::info!(trace_id = %trace_id.0, id = user.id, "User created");
            success_response(StatusCode::CREATED, user)
        }
        Err(e) => storage_failure(&trace_id, "create user", e),
    }
}

/// 分页查询用户列表。
/// 默认排序：`createdAt` 倒序；默认分页：`page=1&pageSize=20`。
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "用户分页列表", body = UserListResponse),
        (status = 500, description = "存储异常", body = ApiError)
    )
)]
async fn list_users(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Response {
    let page = params.page_request();
    match state.users.find_page(params.filter(), page).await {
        Ok(result) => success_response(
            StatusCode::OK,
            UserListResponse {
                data: result.items,
                total: result.total,
                page: page.page(),
                page_size: page.page_size(),
            },
        ),
        Err(e) => storage_failure(&trace_id, "list users", e),
    }
}

/// 获取单个用户。
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "用户 ID")),
    responses(
        (status = 200, description = "用户详情", body = User),
        (status = 404, description = "用户不存在", body = ApiError),
        (status = 500, description = "存储异常", body = ApiError)
    )
)]
async fn get_user(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found_response();
    };
    match state.users.find_by_id(id).await {
        Ok(Some(user)) => success_response(StatusCode::OK, user),
        Ok(None) => not_found_response(),
        Err(e) => storage_failure(&trace_id, "get user", e),
    }
}

/// 更新用户。
/// 仅覆盖请求中提供的字段，未提供的字段保持原值。
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "用户 ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "用户已更新", body = User),
        (status = 400, description = "字段格式错误或邮箱重复", body = ApiError),
        (status = 413, description = "请求体过大", body = ApiError),
        (status = 404, description = "用户不存在", body = ApiError),
        (status = 500, description = "存储异常", body = ApiError)
    )
)]
async fn update_user(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found_response();
    };
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return bad_body_response(rejection),
    };

    match state.users.update(id, &req).await {
        Ok(user) => success_response(StatusCode::OK, user),
        Err(e) => storage_failure(&trace_id, "update user", e),
    }
}

/// 删除用户（物理删除）。
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "用户 ID")),
    responses(
        (status = 204, description = "用户已删除"),
        (status = 404, description = "用户不存在", body = ApiError),
        (status = 500, description = "存储异常", body = ApiError)
    )
)]
async fn delete_user(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found_response();
    };
    match state.users.delete(id).await {
        Ok(true) => {
            tracing::info!(trace_id = %trace_id.0, id, "User deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found_response(),
        Err(e) => storage_failure(&trace_id, "delete user", e),
    }
}

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
}
