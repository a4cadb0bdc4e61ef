use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{resource} with id {id} doesn't exist")]
    NotFound { resource: &'static str, id: Uuid },

    #[error("{resource} with id {id} is still referenced by {count} {dependents}")]
    InUse {
        resource: &'static str,
        id: Uuid,
        count: i64,
        dependents: &'static str,
    },

    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InUse { .. } => "in_use",
            Self::Sqlx(_) => "unclassified",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_resource_and_id() {
        let id = Uuid::nil();
        let err = DbError::not_found("category", id);
        assert_eq!(
            err.to_string(),
            "category with id 00000000-0000-0000-0000-000000000000 doesn't exist"
        );
        assert!(err.is_not_found());
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn in_use_message_counts_dependents() {
        let err = DbError::InUse {
            resource: "category",
            id: Uuid::nil(),
            count: 2,
            dependents: "quizzes",
        };
        assert!(err.to_string().ends_with("is still referenced by 2 quizzes"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn sqlx_errors_are_unclassified() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), "unclassified");
        assert_eq!(err.to_string(), sqlx::Error::PoolTimedOut.to_string());
    }
}
