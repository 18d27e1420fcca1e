use crate::{
    db::with_deadline,
    dto::users::{DeletedUser, LoginRequest, ProfileList, RegisterRequest},
    error::{AppError, AppResult},
    models::Profile,
    response::{ApiResponse, Meta},
    state::AppState,
};

// Passwords are stored and compared as plain text.
pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<Profile>> {
    let RegisterRequest {
        username,
        password,
        email,
    } = payload;

    let profile = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Profile>(
            "INSERT INTO users (username, password, email) VALUES ($1, $2, $3) \
             RETURNING id, username, email",
        )
        .bind(username)
        .bind(password)
        .bind(email)
        .fetch_one(&state.pool),
    )
    .await
    .map_err(|err| match err {
        AppError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            AppError::BadRequest("Username is already taken".into())
        }
        other => other,
    })?;

    tracing::info!(user_id = profile.id, "user registered");
    Ok(ApiResponse::success(
        "User registered",
        profile,
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<Profile>> {
    let LoginRequest { username, password } = payload;
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Unauthorized("Invalid username or password".into()));
    }

    let user = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Profile>(
            "SELECT id, username, email FROM users WHERE username = $1 AND password = $2",
        )
        .bind(username.as_str())
        .bind(password.as_str())
        .fetch_optional(&state.pool),
    )
    .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid username or password".into())),
    };

    Ok(ApiResponse::success("User logged in", user, Some(Meta::empty())))
}

pub async fn get_profile(state: &AppState, username: &str) -> AppResult<ApiResponse<Profile>> {
    let profile = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Profile>("SELECT id, username, email FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&state.pool),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(ApiResponse::success("Profile", profile, Some(Meta::empty())))
}

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<ProfileList>> {
    let items = with_deadline(
        state.query_timeout,
        sqlx::query_as::<_, Profile>("SELECT id, username, email FROM users ORDER BY id")
            .fetch_all(&state.pool),
    )
    .await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Users", ProfileList { items }, Some(meta)))
}

pub async fn delete_user(state: &AppState, id: i64) -> AppResult<ApiResponse<DeletedUser>> {
    let result = with_deadline(
        state.query_timeout,
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&state.pool),
    )
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(ApiResponse::success(
        "User deleted successfully",
        DeletedUser { id },
        Some(Meta::empty()),
    ))
}
