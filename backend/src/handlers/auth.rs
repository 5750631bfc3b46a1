use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        user::{
            LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
            UpdateProfile, User, UserEnvelope, UserResponse,
        },
        MessageResponse,
    },
    services::{auth as auth_service, role_gateway},
    state::AppState,
    utils::jwt::Claims,
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    let user = auth_service::register(&state.pool, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User registered successfully".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = auth_service::login(&state.pool, &state.config, payload).await?;
    Ok(Json(response))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let response = auth_service::refresh(&state.pool, &state.config, payload).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_service::logout(&state.pool, &user, &claims).await?;
    Ok(Json(MessageResponse::new("Successfully logged out")))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<UserResponse>, AppError> {
    let user = role_gateway::get_profile(&state.pool, &user).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<UpdateProfile>,
) -> Result<Json<UserEnvelope>, AppError> {
    let updated = role_gateway::edit_profile(&state.pool, &user, payload).await?;
    Ok(Json(UserEnvelope {
        message: "Profile updated successfully".to_string(),
        user: UserResponse::from(updated),
    }))
}
