//! Class repository, including the subjects linked to each class.

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::class::{AssignSubject, Class, ClassSubject, CreateClass, UpdateClass},
    repositories::{common::ensure_deleted, repository::Repository},
    types::{ClassId, ClassSubjectId},
};

const TABLE_NAME: &str = "classes";
const SELECT_COLUMNS: &str = "id, name, section, class_teacher_id, created_at";
const CLASS_SUBJECT_COLUMNS: &str =
    "cs.id, cs.class_id, cs.subject_id, s.name AS subject_name, s.code AS subject_code, cs.teacher_id";

#[derive(Debug, Default, Clone, Copy)]
pub struct ClassRepository;

impl ClassRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(&self, db: &PgPool, input: &CreateClass) -> Result<Class, AppError> {
        let query = format!(
            "INSERT INTO {} (id, name, section, class_teacher_id) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Class>(&query)
            .bind(ClassId::new())
            .bind(input.name.trim())
            .bind(input.section.trim())
            .bind(input.class_teacher_id)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        db: &PgPool,
        id: ClassId,
        changes: &UpdateClass,
    ) -> Result<Class, AppError> {
        let query = format!(
            "UPDATE {} SET name = COALESCE($2, name), section = COALESCE($3, section), \
             class_teacher_id = COALESCE($4, class_teacher_id) WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Class>(&query)
            .bind(id)
            .bind(changes.name.as_deref().map(str::trim))
            .bind(changes.section.as_deref().map(str::trim))
            .bind(changes.class_teacher_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".into()))
    }

    pub async fn subjects(
        &self,
        db: &PgPool,
        class_id: ClassId,
    ) -> Result<Vec<ClassSubject>, AppError> {
        let query = format!(
            "SELECT {} FROM class_subjects cs JOIN subjects s ON s.id = cs.subject_id \
             WHERE cs.class_id = $1 ORDER BY s.code ASC",
            CLASS_SUBJECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ClassSubject>(&query)
            .bind(class_id)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    /// Links a subject to a class. The class must already exist.
    pub async fn assign_subject(
        &self,
        db: &PgPool,
        class_id: ClassId,
        input: &AssignSubject,
    ) -> Result<ClassSubject, AppError> {
        let query = format!(
            "WITH cs AS ( \
                INSERT INTO class_subjects (id, class_id, subject_id, teacher_id) \
                VALUES ($1, $2, $3, $4) RETURNING * \
             ) SELECT {} FROM cs JOIN subjects s ON s.id = cs.subject_id",
            CLASS_SUBJECT_COLUMNS
        );
        let row = sqlx::query_as::<_, ClassSubject>(&query)
            .bind(ClassSubjectId::new())
            .bind(class_id)
            .bind(input.subject_id)
            .bind(input.teacher_id)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    pub async fn unassign_subject(&self, db: &PgPool, id: ClassSubjectId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM class_subjects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        ensure_deleted(result, "Class subject")
    }
}

impl Repository<Class> for ClassRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = ClassId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<Class>, AppError> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY name ASC, section ASC",
            SELECT_COLUMNS, Self::TABLE
        );
        let rows = sqlx::query_as::<_, Class>(&query).fetch_all(db).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, db: &PgPool, id: ClassId) -> Result<Class, AppError> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", SELECT_COLUMNS, Self::TABLE);
        sqlx::query_as::<_, Class>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".into()))
    }

    async fn delete(&self, db: &PgPool, id: ClassId) -> Result<(), AppError> {
        let query = format!("DELETE FROM {} WHERE id = $1", Self::TABLE);
        let result = sqlx::query(&query).bind(id).execute(db).await?;
        ensure_deleted(result, "Class")
    }
}
