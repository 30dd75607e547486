use crate::application::repos::RepoError;

/// Postgres SQLSTATE for `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        },
        sqlx::Error::Database(db) if db.code().as_deref() == Some(QUERY_CANCELED) => {
            RepoError::Timeout
        }
        sqlx::Error::Database(db) if db.message().contains("invalid input syntax") => {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.is_check_violation() || db.message().contains("violates") => {
            RepoError::Integrity {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}
