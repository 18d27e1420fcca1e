use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};

use crate::{
    dto::users::{DeletedUser, LoginRequest, ProfileList, ProfileQuery, RegisterRequest},
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    models::Profile,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/users", get(list_users))
        .route("/users/{id}", delete(delete_user))
}

#[utoipa::path(
    post,
    path = "/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<Profile>),
        (status = 400, description = "Invalid payload or username taken"),
        (status = 500, description = "Database error"),
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Profile>>)> {
    let resp = user_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<Profile>),
        (status = 400, description = "Invalid request payload"),
        (status = 401, description = "Invalid username or password"),
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let resp = user_service::login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/user/profile",
    params(ProfileQuery),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<Profile>),
        (status = 400, description = "Username is required"),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn profile(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProfileQuery>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let username = query
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("Username is required".into()))?;
    let resp = user_service::get_profile(&state, &username).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/user/users",
    responses(
        (status = 200, description = "All user profiles", body = ApiResponse<ProfileList>),
        (status = 500, description = "Database error"),
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProfileList>>> {
    let resp = user_service::list_users(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/user/users/{id}",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<DeletedUser>),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Database error"),
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<DeletedUser>>> {
    let resp = user_service::delete_user(&state, id).await?;
    Ok(Json(resp))
}
