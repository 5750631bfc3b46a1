//! Teacher profile repository.

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::teacher::{CreateTeacherProfile, TeacherProfile, UpdateTeacherProfile},
    repositories::{common::ensure_deleted, repository::Repository},
    types::{TeacherProfileId, UserId},
    validation::normalize_optional,
};

const TABLE_NAME: &str = "teacher_profiles";
const SELECT_COLUMNS: &str = "tp.id, tp.user_id, u.username, tp.qualification, \
    tp.experience_years, tp.specialization, tp.phone, tp.hire_date, tp.is_active";

#[derive(Debug, Default, Clone, Copy)]
pub struct TeacherRepository;

impl TeacherRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_user(
        &self,
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<TeacherProfile>, AppError> {
        let query = format!("{} WHERE tp.user_id = $1", Self::base_select_query());
        let row = sqlx::query_as::<_, TeacherProfile>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn create(
        &self,
        db: &PgPool,
        input: &CreateTeacherProfile,
    ) -> Result<TeacherProfile, AppError> {
        let query = format!(
            "WITH tp AS ( \
                INSERT INTO {} (id, user_id, qualification, experience_years, specialization, \
                phone, hire_date) \
                VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, CURRENT_DATE)) \
                RETURNING * \
             ) SELECT {} FROM tp JOIN users u ON u.id = tp.user_id",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, TeacherProfile>(&query)
            .bind(TeacherProfileId::new())
            .bind(input.user_id)
            .bind(normalize_optional(input.qualification.clone()))
            .bind(input.experience_years)
            .bind(normalize_optional(input.specialization.clone()))
            .bind(normalize_optional(input.phone.clone()))
            .bind(input.hire_date)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        db: &PgPool,
        id: TeacherProfileId,
        changes: &UpdateTeacherProfile,
    ) -> Result<TeacherProfile, AppError> {
        let query = format!(
            "WITH tp AS ( \
                UPDATE {} SET \
                    qualification = COALESCE($2, qualification), \
                    experience_years = COALESCE($3, experience_years), \
                    specialization = COALESCE($4, specialization), \
                    phone = COALESCE($5, phone), \
                    is_active = COALESCE($6, is_active) \
                WHERE id = $1 RETURNING * \
             ) SELECT {} FROM tp JOIN users u ON u.id = tp.user_id",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, TeacherProfile>(&query)
            .bind(id)
            .bind(&changes.qualification)
            .bind(changes.experience_years)
            .bind(&changes.specialization)
            .bind(&changes.phone)
            .bind(changes.is_active)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Teacher not found".into()))
    }

    fn base_select_query() -> String {
        format!(
            "SELECT {} FROM {} tp JOIN users u ON u.id = tp.user_id",
            SELECT_COLUMNS, TABLE_NAME
        )
    }
}

impl Repository<TeacherProfile> for TeacherRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = TeacherProfileId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<TeacherProfile>, AppError> {
        let query = format!("{} ORDER BY u.username ASC", Self::base_select_query());
        let rows = sqlx::query_as::<_, TeacherProfile>(&query)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(
        &self,
        db: &PgPool,
        id: TeacherProfileId,
    ) -> Result<TeacherProfile, AppError> {
        let query = format!("{} WHERE tp.id = $1", Self::base_select_query());
        sqlx::query_as::<_, TeacherProfile>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Teacher not found".into()))
    }

    async fn delete(&self, db: &PgPool, id: TeacherProfileId) -> Result<(), AppError> {
        let query = format!("DELETE FROM {} WHERE id = $1", Self::TABLE);
        let result = sqlx::query(&query).bind(id).execute(db).await?;
        ensure_deleted(result, "Teacher")
    }
}
