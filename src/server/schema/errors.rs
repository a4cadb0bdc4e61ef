use async_graphql::{Error, ErrorExtensions};

use crate::db::DbError;

impl ErrorExtensions for DbError {
    fn extend(&self) -> Error {
        let code = match self {
            DbError::NotFound { .. } => "NOT_FOUND",
            DbError::InUse { .. } => "CONFLICT",
            DbError::Sqlx(_) => "INTERNAL",
        };
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

/// Turns a failed lookup into a GraphQL error carrying `extensions.code`.
pub(super) fn query_error(err: DbError) -> Error {
    if let DbError::Sqlx(source) = &err {
        tracing::error!(error = %source, "query failed");
    }
    err.extend()
}
