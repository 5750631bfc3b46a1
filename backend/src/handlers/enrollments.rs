use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        enrollment::{CreateEnrollment, Enrollment, EnrollmentQuery, UpdateEnrollment},
        user::User,
        MessageResponse,
    },
    repositories::{EnrollmentRepository, Repository},
    services::role_gateway::{authorize, Action, Resource},
    state::AppState,
    types::EnrollmentId,
};

pub async fn list_enrollments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(filter): Query<EnrollmentQuery>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    authorize(user.role, Resource::Enrollments, Action::Read)?;
    Ok(Json(EnrollmentRepository::new().list(&state.pool, &filter).await?))
}

pub async fn create_enrollment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateEnrollment>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    authorize(user.role, Resource::Enrollments, Action::Write)?;
    let enrollment = EnrollmentRepository::new()
        .create(&state.pool, &payload)
        .await?;
    tracing::info!(
        actor_id = %user.id,
        student_id = %enrollment.student_id,
        class_id = %enrollment.class_id,
        "student enrolled"
    );
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn update_enrollment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<EnrollmentId>,
    Json(payload): Json<UpdateEnrollment>,
) -> Result<Json<Enrollment>, AppError> {
    authorize(user.role, Resource::Enrollments, Action::Write)?;
    let enrollment = EnrollmentRepository::new()
        .set_active(&state.pool, id, payload.active)
        .await?;
    Ok(Json(enrollment))
}

pub async fn delete_enrollment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<EnrollmentId>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(user.role, Resource::Enrollments, Action::Write)?;
    EnrollmentRepository::new().delete(&state.pool, id).await?;
    Ok(Json(MessageResponse::new("Enrollment deleted successfully")))
}
