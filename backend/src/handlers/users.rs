use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        user::{CreateUser, User, UserEnvelope, UserResponse},
        MessageResponse,
    },
    services::{auth as auth_service, role_gateway},
    state::AppState,
    types::UserId,
    validation::validate_payload,
};

pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = role_gateway::list_users(&state.pool, &user).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Admin-only: provisions an account with any role.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    validate_payload(&payload)?;
    let user = auth_service::create_account(&state.pool, payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User created successfully".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(user_id): Path<UserId>,
) -> Result<Json<MessageResponse>, AppError> {
    role_gateway::delete_user(&state.pool, &user, user_id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
