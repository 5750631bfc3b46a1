use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        student::{CreateStudentProfile, StudentProfile, UpdateStudentProfile},
        user::{User, UserRole},
        MessageResponse,
    },
    repositories::{user as user_repo, Repository, StudentRepository},
    services::role_gateway::{authorize, Access, Action, Resource},
    state::AppState,
    types::StudentProfileId,
    validation::validate_payload,
};

pub async fn list_students(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<StudentProfile>>, AppError> {
    let repo = StudentRepository::new();
    let students = match authorize(user.role, Resource::Students, Action::Read)? {
        Access::All => repo.find_all(&state.pool).await?,
        Access::OwnOnly => repo
            .find_by_user(&state.pool, user.id)
            .await?
            .into_iter()
            .collect(),
    };
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<StudentProfileId>,
) -> Result<Json<StudentProfile>, AppError> {
    let access = authorize(user.role, Resource::Students, Action::Read)?;
    let student = StudentRepository::new().find_by_id(&state.pool, id).await?;
    if access == Access::OwnOnly && student.user_id != user.id {
        return Err(AppError::Forbidden(
            "Students may only view their own profile".into(),
        ));
    }
    Ok(Json(student))
}

pub async fn create_student(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateStudentProfile>,
) -> Result<(StatusCode, Json<StudentProfile>), AppError> {
    authorize(user.role, Resource::Students, Action::Write)?;
    validate_payload(&payload)?;

    let owner = user_repo::find_user_by_id(&state.pool, payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if owner.role != UserRole::Student {
        return Err(AppError::BadRequest("User does not have the student role".into()));
    }

    let student = StudentRepository::new().create(&state.pool, &payload).await?;
    tracing::info!(actor_id = %user.id, student_id = %student.id, "student profile created");
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<StudentProfileId>,
    Json(payload): Json<UpdateStudentProfile>,
) -> Result<Json<StudentProfile>, AppError> {
    authorize(user.role, Resource::Students, Action::Write)?;
    validate_payload(&payload)?;
    let student = StudentRepository::new()
        .update(&state.pool, id, &payload)
        .await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<StudentProfileId>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(user.role, Resource::Students, Action::Write)?;
    StudentRepository::new().delete(&state.pool, id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
