use crate::db::DbError;
use crate::telemetry::MUTATION_FAILURES;

/// Declares the `{ success, <entity>, error }` object a mutation answers with.
macro_rules! mutation_payload {
    ($(#[$meta:meta])* $name:ident { $field:ident: $node:ty }) => {
        $(#[$meta])*
        #[derive(async_graphql::SimpleObject, Debug)]
        pub struct $name {
            /// Whether the mutation was applied.
            pub success: bool,
            pub $field: Option<$node>,
            /// Why the mutation was not applied.
            pub error: Option<String>,
        }

        impl $name {
            pub(crate) fn applied($field: Option<$node>) -> Self {
                Self {
                    success: true,
                    $field,
                    error: None,
                }
            }

            pub(crate) fn rejected(mutation: &'static str, err: $crate::db::DbError) -> Self {
                $crate::server::schema::payload::report_failure(mutation, &err);
                Self {
                    success: false,
                    $field: None,
                    error: Some(err.to_string()),
                }
            }
        }
    };
}

pub(crate) use mutation_payload;

pub(crate) fn report_failure(mutation: &'static str, err: &DbError) {
    match err {
        DbError::Sqlx(_) => tracing::error!(mutation, error = %err, "mutation failed"),
        _ => tracing::info!(mutation, error = %err, "mutation rejected"),
    }
    MUTATION_FAILURES
        .with_label_values(&[mutation, err.kind()])
        .inc();
}
