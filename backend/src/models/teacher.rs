//! Teacher profiles: the one-to-one extension of a teacher-role user.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    types::{TeacherProfileId, UserId},
    validation::rules::validate_phone,
};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TeacherProfile {
    pub id: TeacherProfileId,
    pub user_id: UserId,
    pub username: String,
    pub qualification: Option<String>,
    pub experience_years: i32,
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub hire_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherProfile {
    pub user_id: UserId,
    #[validate(length(max = 100))]
    pub qualification: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub experience_years: i32,
    #[validate(length(max = 100))]
    pub specialization: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    /// Defaults to today.
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherProfile {
    #[validate(length(max = 100))]
    pub qualification: Option<String>,
    #[validate(range(min = 0))]
    pub experience_years: Option<i32>,
    #[validate(length(max = 100))]
    pub specialization: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
