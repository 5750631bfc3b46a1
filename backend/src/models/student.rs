//! Student profiles: the one-to-one extension of a student-role user.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    types::{StudentProfileId, UserId},
    validation::rules::{validate_not_blank, validate_phone},
};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentProfile {
    pub id: StudentProfileId,
    pub user_id: UserId,
    /// Username of the owning account.
    pub username: String,
    pub roll_no: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub parent_name: Option<String>,
    pub admission_date: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentProfile {
    pub user_id: UserId,
    #[validate(custom(function = "validate_not_blank"), length(max = 20))]
    pub roll_no: String,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    pub address: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub parent_name: Option<String>,
    /// Defaults to today.
    pub admission_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentProfile {
    #[validate(custom(function = "validate_not_blank"), length(max = 20))]
    pub roll_no: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    pub address: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub parent_name: Option<String>,
    pub is_active: Option<bool>,
}
