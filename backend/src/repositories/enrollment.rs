//! Enrollment repository.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::enrollment::{CreateEnrollment, Enrollment, EnrollmentQuery},
    repositories::{
        common::{ensure_deleted, push_clause},
        repository::Repository,
    },
    types::EnrollmentId,
};

const TABLE_NAME: &str = "enrollments";
const SELECT_COLUMNS: &str = "id, student_id, class_id, joined_date, active";

#[derive(Debug, Default, Clone, Copy)]
pub struct EnrollmentRepository;

impl EnrollmentRepository {
    pub fn new() -> Self {
        Self
    }

    /// Lists enrollments filtered by class and/or student.
    pub async fn list(
        &self,
        db: &PgPool,
        filter: &EnrollmentQuery,
    ) -> Result<Vec<Enrollment>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM {}",
            SELECT_COLUMNS, TABLE_NAME
        ));
        let mut has_clause = false;
        if let Some(class_id) = filter.class_id {
            push_clause(&mut builder, &mut has_clause);
            builder.push("class_id = ").push_bind(class_id);
        }
        if let Some(student_id) = filter.student_id {
            push_clause(&mut builder, &mut has_clause);
            builder.push("student_id = ").push_bind(student_id);
        }
        builder.push(" ORDER BY joined_date ASC, id ASC");
        let rows = builder.build_query_as::<Enrollment>().fetch_all(db).await?;
        Ok(rows)
    }

    pub async fn create(
        &self,
        db: &PgPool,
        input: &CreateEnrollment,
    ) -> Result<Enrollment, AppError> {
        let query = format!(
            "INSERT INTO {} (id, student_id, class_id) VALUES ($1, $2, $3) RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Enrollment>(&query)
            .bind(EnrollmentId::new())
            .bind(input.student_id)
            .bind(input.class_id)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    pub async fn set_active(
        &self,
        db: &PgPool,
        id: EnrollmentId,
        active: bool,
    ) -> Result<Enrollment, AppError> {
        let query = format!(
            "UPDATE {} SET active = $2 WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(active)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".into()))
    }
}

impl Repository<Enrollment> for EnrollmentRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = EnrollmentId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<Enrollment>, AppError> {
        self.list(db, &EnrollmentQuery::default()).await
    }

    async fn find_by_id(&self, db: &PgPool, id: EnrollmentId) -> Result<Enrollment, AppError> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", SELECT_COLUMNS, Self::TABLE);
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".into()))
    }

    async fn delete(&self, db: &PgPool, id: EnrollmentId) -> Result<(), AppError> {
        let query = format!("DELETE FROM {} WHERE id = $1", Self::TABLE);
        let result = sqlx::query(&query).bind(id).execute(db).await?;
        ensure_deleted(result, "Enrollment")
    }
}
