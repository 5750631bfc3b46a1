use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        subject::{CreateSubject, Subject, UpdateSubject},
        user::User,
        MessageResponse,
    },
    repositories::{Repository, SubjectRepository},
    services::role_gateway::{authorize, Action, Resource},
    state::AppState,
    types::SubjectId,
    validation::validate_payload,
};

pub async fn list_subjects(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Subject>>, AppError> {
    authorize(user.role, Resource::Subjects, Action::Read)?;
    Ok(Json(SubjectRepository::new().find_all(&state.pool).await?))
}

pub async fn get_subject(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<SubjectId>,
) -> Result<Json<Subject>, AppError> {
    authorize(user.role, Resource::Subjects, Action::Read)?;
    Ok(Json(SubjectRepository::new().find_by_id(&state.pool, id).await?))
}

pub async fn create_subject(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateSubject>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    authorize(user.role, Resource::Subjects, Action::Write)?;
    validate_payload(&payload)?;
    let subject = SubjectRepository::new().create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn update_subject(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<SubjectId>,
    Json(payload): Json<UpdateSubject>,
) -> Result<Json<Subject>, AppError> {
    authorize(user.role, Resource::Subjects, Action::Write)?;
    validate_payload(&payload)?;
    let subject = SubjectRepository::new()
        .update(&state.pool, id, &payload)
        .await?;
    Ok(Json(subject))
}

pub async fn delete_subject(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<SubjectId>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(user.role, Resource::Subjects, Action::Write)?;
    SubjectRepository::new().delete(&state.pool, id).await?;
    Ok(Json(MessageResponse::new("Subject deleted successfully")))
}
