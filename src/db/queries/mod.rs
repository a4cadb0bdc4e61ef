pub mod answers;
pub mod categories;
pub mod questions;
pub mod quizzes;

use sqlx::SqliteConnection;
use uuid::Uuid;

/// Counts rows of `sql` (a `SELECT COUNT(*) ... WHERE <col> = ?1` statement)
/// for `id`.
async fn count(conn: &mut SqliteConnection, sql: &str, id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(sql).bind(id).fetch_one(conn).await
}
