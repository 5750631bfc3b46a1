//! Repository trait shared by the reference-data repositories.

use crate::error::AppError;
use sqlx::PgPool;

/// Read and delete access common to every reference-data table.
///
/// Creation and updates take resource-specific payloads and live on the
/// concrete repositories.
#[allow(async_fn_in_trait)]
pub trait Repository<T> {
    /// Target table name.
    const TABLE: &'static str;
    /// Primary key type for the record.
    type Id;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<T>, AppError>;

    /// Find a single record by ID, or `AppError::NotFound`.
    async fn find_by_id(&self, db: &PgPool, id: Self::Id) -> Result<T, AppError>;

    /// Delete a record by ID, or `AppError::NotFound` if nothing was deleted.
    async fn delete(&self, db: &PgPool, id: Self::Id) -> Result<(), AppError>;
}
