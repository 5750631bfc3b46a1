use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        teacher::{CreateTeacherProfile, TeacherProfile, UpdateTeacherProfile},
        user::{User, UserRole},
        MessageResponse,
    },
    repositories::{user as user_repo, Repository, TeacherRepository},
    services::role_gateway::{authorize, Action, Resource},
    state::AppState,
    types::TeacherProfileId,
    validation::validate_payload,
};

pub async fn list_teachers(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TeacherProfile>>, AppError> {
    authorize(user.role, Resource::Teachers, Action::Read)?;
    let teachers = TeacherRepository::new().find_all(&state.pool).await?;
    Ok(Json(teachers))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<TeacherProfileId>,
) -> Result<Json<TeacherProfile>, AppError> {
    authorize(user.role, Resource::Teachers, Action::Read)?;
    let teacher = TeacherRepository::new().find_by_id(&state.pool, id).await?;
    Ok(Json(teacher))
}

pub async fn create_teacher(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateTeacherProfile>,
) -> Result<(StatusCode, Json<TeacherProfile>), AppError> {
    authorize(user.role, Resource::Teachers, Action::Write)?;
    validate_payload(&payload)?;

    let owner = user_repo::find_user_by_id(&state.pool, payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if owner.role != UserRole::Teacher {
        return Err(AppError::BadRequest("User does not have the teacher role".into()));
    }

    let teacher = TeacherRepository::new().create(&state.pool, &payload).await?;
    tracing::info!(actor_id = %user.id, teacher_id = %teacher.id, "teacher profile created");
    Ok((StatusCode::CREATED, Json(teacher)))
}

pub async fn update_teacher(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<TeacherProfileId>,
    Json(payload): Json<UpdateTeacherProfile>,
) -> Result<Json<TeacherProfile>, AppError> {
    authorize(user.role, Resource::Teachers, Action::Write)?;
    validate_payload(&payload)?;
    let teacher = TeacherRepository::new()
        .update(&state.pool, id, &payload)
        .await?;
    Ok(Json(teacher))
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<TeacherProfileId>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(user.role, Resource::Teachers, Action::Write)?;
    TeacherRepository::new().delete(&state.pool, id).await?;
    Ok(Json(MessageResponse::new("Teacher deleted successfully")))
}
