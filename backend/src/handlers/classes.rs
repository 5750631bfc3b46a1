use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        class::{AssignSubject, Class, ClassSubject, CreateClass, UpdateClass},
        user::User,
        MessageResponse,
    },
    repositories::{ClassRepository, Repository, SubjectRepository},
    services::role_gateway::{authorize, Action, Resource},
    state::AppState,
    types::{ClassId, ClassSubjectId},
    validation::validate_payload,
};

pub async fn list_classes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Class>>, AppError> {
    authorize(user.role, Resource::Classes, Action::Read)?;
    Ok(Json(ClassRepository::new().find_all(&state.pool).await?))
}

pub async fn get_class(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<ClassId>,
) -> Result<Json<Class>, AppError> {
    authorize(user.role, Resource::Classes, Action::Read)?;
    Ok(Json(ClassRepository::new().find_by_id(&state.pool, id).await?))
}

pub async fn create_class(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateClass>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    authorize(user.role, Resource::Classes, Action::Write)?;
    validate_payload(&payload)?;
    let class = ClassRepository::new().create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

pub async fn update_class(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<ClassId>,
    Json(payload): Json<UpdateClass>,
) -> Result<Json<Class>, AppError> {
    authorize(user.role, Resource::Classes, Action::Write)?;
    validate_payload(&payload)?;
    let class = ClassRepository::new()
        .update(&state.pool, id, &payload)
        .await?;
    Ok(Json(class))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<ClassId>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(user.role, Resource::Classes, Action::Write)?;
    ClassRepository::new().delete(&state.pool, id).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}

pub async fn list_class_subjects(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<ClassId>,
) -> Result<Json<Vec<ClassSubject>>, AppError> {
    authorize(user.role, Resource::ClassSubjects, Action::Read)?;
    let repo = ClassRepository::new();
    let class = repo.find_by_id(&state.pool, id).await?;
    Ok(Json(repo.subjects(&state.pool, class.id).await?))
}

pub async fn assign_subject(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<ClassId>,
    Json(payload): Json<AssignSubject>,
) -> Result<(StatusCode, Json<ClassSubject>), AppError> {
    authorize(user.role, Resource::ClassSubjects, Action::Write)?;
    let repo = ClassRepository::new();
    let class = repo.find_by_id(&state.pool, id).await?;
    if !SubjectRepository::new()
        .exists(&state.pool, payload.subject_id)
        .await?
    {
        return Err(AppError::BadRequest("Subject does not exist".into()));
    }
    let link = repo.assign_subject(&state.pool, class.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn unassign_subject(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<ClassSubjectId>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(user.role, Resource::ClassSubjects, Action::Write)?;
    ClassRepository::new().unassign_subject(&state.pool, id).await?;
    Ok(Json(MessageResponse::new("Subject removed from class")))
}
