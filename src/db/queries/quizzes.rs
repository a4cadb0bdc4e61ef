use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::categories;
use crate::db::{DbError, Quiz};

const RESOURCE: &str = "quiz";

#[tracing::instrument(skip(pool))]
pub async fn get_all_quizzes(pool: &SqlitePool) -> Result<Vec<Quiz>, DbError> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        r#"
SELECT id, title, category_id, created_at, updated_at
FROM quizzes
ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(quizzes)
}

#[tracing::instrument(skip(pool))]
pub async fn get_quizzes_for_category(
    pool: &SqlitePool,
    category_id: Uuid,
) -> Result<Vec<Quiz>, DbError> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        r#"
SELECT id, title, category_id, created_at, updated_at
FROM quizzes
WHERE category_id = ?1
ORDER BY rowid
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(quizzes)
}

#[tracing::instrument(skip(pool))]
pub async fn get_quiz(pool: &SqlitePool, id: Uuid) -> Result<Quiz, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_quiz(&mut conn, id).await
}

async fn fetch_quiz(conn: &mut SqliteConnection, id: Uuid) -> Result<Quiz, DbError> {
    sqlx::query_as::<_, Quiz>(
        r#"
SELECT id, title, category_id, created_at, updated_at
FROM quizzes
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DbError::not_found(RESOURCE, id))
}

pub(crate) async fn exists(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let found = super::count(conn, "SELECT COUNT(*) FROM quizzes WHERE id = ?1", id).await?;
    Ok(found > 0)
}

async fn ensure_category(conn: &mut SqliteConnection, category_id: Uuid) -> Result<(), DbError> {
    if categories::exists(conn, category_id).await? {
        Ok(())
    } else {
        Err(DbError::not_found("category", category_id))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn create_quiz(
    pool: &SqlitePool,
    title: &str,
    category_id: Uuid,
) -> Result<Quiz, DbError> {
    let mut tx = pool.begin().await?;
    ensure_category(&mut tx, category_id).await?;

    let now = Utc::now();
    let quiz = Quiz {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        category_id,
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        r#"
INSERT INTO quizzes (id, title, category_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(quiz.id)
    .bind(&quiz.title)
    .bind(quiz.category_id)
    .bind(quiz.created_at)
    .bind(quiz.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(id = %quiz.id, "quiz created");
    Ok(quiz)
}

#[tracing::instrument(skip(pool))]
pub async fn update_quiz(
    pool: &SqlitePool,
    id: Uuid,
    title: &str,
    category_id: Uuid,
) -> Result<Quiz, DbError> {
    let mut tx = pool.begin().await?;
    if !exists(&mut tx, id).await? {
        return Err(DbError::not_found(RESOURCE, id));
    }
    ensure_category(&mut tx, category_id).await?;

    sqlx::query(
        r#"
UPDATE quizzes SET title = ?1, category_id = ?2, updated_at = ?3 WHERE id = ?4
        "#,
    )
    .bind(title)
    .bind(category_id)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let quiz = fetch_quiz(&mut tx, id).await?;
    tx.commit().await?;
    Ok(quiz)
}

/// Deletes a quiz; its questions and their answers go with it.
#[tracing::instrument(skip(pool))]
pub async fn delete_quiz(pool: &SqlitePool, id: Uuid) -> Result<(), DbError> {
    let deleted = sqlx::query("DELETE FROM quizzes WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(DbError::not_found(RESOURCE, id));
    }
    tracing::info!(%id, "quiz deleted");
    Ok(())
}

/// Inserts quizzes or overwrites the ones whose id already exists. Referenced
/// categories have to be imported first.
#[tracing::instrument(skip_all, fields(count = quizzes.len()))]
pub async fn import_quizzes(pool: &SqlitePool, quizzes: Vec<Quiz>) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    for quiz in &quizzes {
        ensure_category(&mut tx, quiz.category_id).await?;
        sqlx::query(
            r#"
INSERT INTO quizzes (id, title, category_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    title = excluded.title,
    category_id = excluded.category_id,
    updated_at = excluded.updated_at
            "#,
        )
        .bind(quiz.id)
        .bind(&quiz.title)
        .bind(quiz.category_id)
        .bind(quiz.created_at)
        .bind(quiz.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    tracing::info!(count = quizzes.len(), "quizzes imported");
    Ok(())
}
