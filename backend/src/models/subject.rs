use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{types::SubjectId, validation::rules::validate_not_blank};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Unique catalogue code, e.g. `MATH-101`.
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubject {
    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 20))]
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubject {
    #[validate(custom(function = "validate_not_blank"), length(max = 100))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank"), length(max = 20))]
    pub code: Option<String>,
    pub description: Option<String>,
}
