//! Classes (name + section) and the subjects taught in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    types::{ClassId, ClassSubjectId, SubjectId, TeacherProfileId},
    validation::rules::validate_not_blank,
};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub section: String,
    pub class_teacher_id: Option<TeacherProfileId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClass {
    #[validate(custom(function = "validate_not_blank"), length(max = 50))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 10))]
    pub section: String,
    pub class_teacher_id: Option<TeacherProfileId>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClass {
    #[validate(custom(function = "validate_not_blank"), length(max = 50))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 10))]
    pub section: Option<String>,
    pub class_teacher_id: Option<TeacherProfileId>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassSubject {
    pub id: ClassSubjectId,
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub subject_code: String,
    pub teacher_id: Option<TeacherProfileId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignSubject {
    pub subject_id: SubjectId,
    pub teacher_id: Option<TeacherProfileId>,
}
