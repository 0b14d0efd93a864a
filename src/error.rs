//! Error type returned by [`GymStore`](crate::GymStore) operations.

use sea_orm::{DbErr, SqlErr};

/// Errors surfaced to callers of the store.
///
/// Constraint enforcement lives in the database; this type only sorts the
/// database's rejections into the cases a caller can act on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write broke a uniqueness, check or foreign-key constraint.
    #[error("record invalid: {0}")]
    Invalid(String),

    /// A delete was refused because other records still reference this one.
    #[error("{entity} {id} is referenced by other records and cannot be deleted")]
    Protected { entity: &'static str, id: i32 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Classifies a database error raised by a write.
    ///
    /// Constraint violations become [`Error::Invalid`]; anything else is kept as
    /// [`Error::Database`].
    pub(crate) fn from_write(err: DbErr) -> Self {
        match constraint_violation(&err) {
            Some(_) => {
                tracing::warn!(error = %err, "write rejected by constraint");
                Error::Invalid(err.to_string())
            }
            None => Error::Database(err),
        }
    }

    /// Classifies a database error raised by a delete of `entity` `id`.
    ///
    /// A foreign-key violation here means a protected reference blocked it.
    pub(crate) fn from_delete(err: DbErr, entity: &'static str, id: i32) -> Self {
        match constraint_violation(&err) {
            Some(Violation::ForeignKey) => {
                tracing::warn!(entity, id, error = %err, "delete blocked by protected reference");
                Error::Protected { entity, id }
            }
            Some(_) => Error::Invalid(err.to_string()),
            None => Error::Database(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    Unique,
    ForeignKey,
    Check,
}

fn constraint_violation(err: &DbErr) -> Option<Violation> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => return Some(Violation::Unique),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => return Some(Violation::ForeignKey),
        _ => {}
    }
    classify_message(&err.to_string())
}

// SQLite reports CHECK failures by message only; Postgres uses SQLSTATE 23514.
fn classify_message(msg: &str) -> Option<Violation> {
    let msg = msg.to_lowercase();
    if msg.contains("check constraint") || msg.contains("23514") {
        Some(Violation::Check)
    } else if msg.contains("foreign key constraint") || msg.contains("23503") {
        Some(Violation::ForeignKey)
    } else if msg.contains("unique constraint") || msg.contains("duplicate key") {
        Some(Violation::Unique)
    } else {
        None
    }
}
