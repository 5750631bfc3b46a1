use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::types::{ClassId, EnrollmentId, StudentProfileId};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentProfileId,
    pub class_id: ClassId,
    pub joined_date: NaiveDate,
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEnrollment {
    pub student_id: StudentProfileId,
    pub class_id: ClassId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEnrollment {
    pub active: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnrollmentQuery {
    pub class_id: Option<ClassId>,
    pub student_id: Option<StudentProfileId>,
}
