//! Student profile repository.

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::student::{CreateStudentProfile, StudentProfile, UpdateStudentProfile},
    repositories::{common::ensure_deleted, repository::Repository},
    types::{StudentProfileId, UserId},
    validation::normalize_optional,
};

const TABLE_NAME: &str = "student_profiles";
const SELECT_COLUMNS: &str = "sp.id, sp.user_id, u.username, sp.roll_no, sp.date_of_birth, \
    sp.gender, sp.address, sp.phone, sp.parent_name, sp.admission_date, sp.is_active";

#[derive(Debug, Default, Clone, Copy)]
pub struct StudentRepository;

impl StudentRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_user(
        &self,
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<StudentProfile>, AppError> {
        let query = format!("{} WHERE sp.user_id = $1", Self::base_select_query());
        let row = sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn create(
        &self,
        db: &PgPool,
        input: &CreateStudentProfile,
    ) -> Result<StudentProfile, AppError> {
        let query = format!(
            "WITH sp AS ( \
                INSERT INTO {} (id, user_id, roll_no, date_of_birth, gender, address, phone, \
                parent_name, admission_date) \
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, CURRENT_DATE)) \
                RETURNING * \
             ) SELECT {} FROM sp JOIN users u ON u.id = sp.user_id",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, StudentProfile>(&query)
            .bind(StudentProfileId::new())
            .bind(input.user_id)
            .bind(input.roll_no.trim())
            .bind(input.date_of_birth)
            .bind(normalize_optional(input.gender.clone()))
            .bind(normalize_optional(input.address.clone()))
            .bind(normalize_optional(input.phone.clone()))
            .bind(normalize_optional(input.parent_name.clone()))
            .bind(input.admission_date)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        db: &PgPool,
        id: StudentProfileId,
        changes: &UpdateStudentProfile,
    ) -> Result<StudentProfile, AppError> {
        let query = format!(
            "WITH sp AS ( \
                UPDATE {} SET \
                    roll_no = COALESCE($2, roll_no), \
                    date_of_birth = COALESCE($3, date_of_birth), \
                    gender = COALESCE($4, gender), \
                    address = COALESCE($5, address), \
                    phone = COALESCE($6, phone), \
                    parent_name = COALESCE($7, parent_name), \
                    is_active = COALESCE($8, is_active) \
                WHERE id = $1 RETURNING * \
             ) SELECT {} FROM sp JOIN users u ON u.id = sp.user_id",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(id)
            .bind(changes.roll_no.as_deref().map(str::trim))
            .bind(changes.date_of_birth)
            .bind(&changes.gender)
            .bind(&changes.address)
            .bind(&changes.phone)
            .bind(&changes.parent_name)
            .bind(changes.is_active)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))
    }

    fn base_select_query() -> String {
        format!(
            "SELECT {} FROM {} sp JOIN users u ON u.id = sp.user_id",
            SELECT_COLUMNS, TABLE_NAME
        )
    }
}

impl Repository<StudentProfile> for StudentRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = StudentProfileId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<StudentProfile>, AppError> {
        let query = format!("{} ORDER BY sp.roll_no ASC", Self::base_select_query());
        let rows = sqlx::query_as::<_, StudentProfile>(&query)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(
        &self,
        db: &PgPool,
        id: StudentProfileId,
    ) -> Result<StudentProfile, AppError> {
        let query = format!("{} WHERE sp.id = $1", Self::base_select_query());
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))
    }

    async fn delete(&self, db: &PgPool, id: StudentProfileId) -> Result<(), AppError> {
        let query = format!("DELETE FROM {} WHERE id = $1", Self::TABLE);
        let result = sqlx::query(&query).bind(id).execute(db).await?;
        ensure_deleted(result, "Student")
    }
}
