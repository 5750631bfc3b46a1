//! Shared repository utilities.

use sqlx::{postgres::PgQueryResult, Postgres, QueryBuilder};

use crate::error::AppError;

/// Appends WHERE or AND to the query builder depending on whether a clause has already been added.
pub fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}

/// Turns a DELETE that matched no rows into a not-found error.
pub fn ensure_deleted(result: PgQueryResult, what: &str) -> Result<(), AppError> {
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("{} not found", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_clause_starts_with_where_then_and() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM t");
        let mut has_clause = false;
        push_clause(&mut builder, &mut has_clause);
        builder.push("a = 1");
        push_clause(&mut builder, &mut has_clause);
        builder.push("b = 2");
        assert_eq!(builder.sql(), "SELECT 1 FROM t WHERE a = 1 AND b = 2");
    }

    #[test]
    fn ensure_deleted_reports_missing_rows() {
        let err = ensure_deleted(PgQueryResult::default(), "Subject").unwrap_err();
        assert_eq!(err.to_string(), "Subject not found");
    }
}
