//! Subject repository.

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::subject::{CreateSubject, Subject, UpdateSubject},
    repositories::{common::ensure_deleted, repository::Repository},
    types::SubjectId,
};

const TABLE_NAME: &str = "subjects";
const SELECT_COLUMNS: &str = "id, name, code, description";

#[derive(Debug, Default, Clone, Copy)]
pub struct SubjectRepository;

impl SubjectRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, db: &PgPool, input: &CreateSubject) -> Result<Subject, AppError> {
        let query = format!(
            "INSERT INTO {} (id, name, code, description) VALUES ($1, $2, $3, $4) RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Subject>(&query)
            .bind(SubjectId::new())
            .bind(input.name.trim())
            .bind(input.code.trim())
            .bind(&input.description)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        db: &PgPool,
        id: SubjectId,
        changes: &UpdateSubject,
    ) -> Result<Subject, AppError> {
        let query = format!(
            "UPDATE {} SET name = COALESCE($2, name), code = COALESCE($3, code), \
             description = COALESCE($4, description) WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(changes.name.as_deref().map(str::trim))
            .bind(changes.code.as_deref().map(str::trim))
            .bind(&changes.description)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Subject not found".into()))
    }

    pub async fn exists(&self, db: &PgPool, id: SubjectId) -> Result<bool, AppError> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", TABLE_NAME);
        let exists = sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .fetch_one(db)
            .await?;
        Ok(exists)
    }
}

impl Repository<Subject> for SubjectRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = SubjectId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<Subject>, AppError> {
        let query = format!("SELECT {} FROM {} ORDER BY code ASC", SELECT_COLUMNS, Self::TABLE);
        let rows = sqlx::query_as::<_, Subject>(&query).fetch_all(db).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, db: &PgPool, id: SubjectId) -> Result<Subject, AppError> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", SELECT_COLUMNS, Self::TABLE);
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Subject not found".into()))
    }

    async fn delete(&self, db: &PgPool, id: SubjectId) -> Result<(), AppError> {
        let query = format!("DELETE FROM {} WHERE id = $1", Self::TABLE);
        let result = sqlx::query(&query).bind(id).execute(db).await?;
        ensure_deleted(result, "Subject")
    }
}
