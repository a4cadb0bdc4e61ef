use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::questions;
use crate::db::{Answer, AnswerInput, DbError};

const RESOURCE: &str = "answer";

#[tracing::instrument(skip(pool))]
pub async fn get_all_answers(pool: &SqlitePool) -> Result<Vec<Answer>, DbError> {
    let answers = sqlx::query_as::<_, Answer>(
        r#"
SELECT id, question_id, text, is_correct, created_at, updated_at
FROM answers
ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(answers)
}

/// Answers of an existing question, possibly none. An unknown question id is
/// reported as not found rather than as an empty list.
#[tracing::instrument(skip(pool))]
pub async fn get_answers_for_question(
    pool: &SqlitePool,
    question_id: Uuid,
) -> Result<Vec<Answer>, DbError> {
    let mut conn = pool.acquire().await?;
    ensure_question(&mut conn, question_id).await?;

    let answers = sqlx::query_as::<_, Answer>(
        r#"
SELECT id, question_id, text, is_correct, created_at, updated_at
FROM answers
WHERE question_id = ?1
ORDER BY rowid
        "#,
    )
    .bind(question_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(answers)
}

#[tracing::instrument(skip(pool))]
pub async fn get_answer(pool: &SqlitePool, id: Uuid) -> Result<Answer, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_answer(&mut conn, id).await
}

async fn fetch_answer(conn: &mut SqliteConnection, id: Uuid) -> Result<Answer, DbError> {
    sqlx::query_as::<_, Answer>(
        r#"
SELECT id, question_id, text, is_correct, created_at, updated_at
FROM answers
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DbError::not_found(RESOURCE, id))
}

async fn ensure_question(conn: &mut SqliteConnection, question_id: Uuid) -> Result<(), DbError> {
    if questions::exists(conn, question_id).await? {
        Ok(())
    } else {
        Err(DbError::not_found("question", question_id))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn create_answer(pool: &SqlitePool, input: AnswerInput) -> Result<Answer, DbError> {
    let mut tx = pool.begin().await?;
    ensure_question(&mut tx, input.question_id).await?;

    let now = Utc::now();
    let answer = Answer {
        id: Uuid::new_v4(),
        question_id: input.question_id,
        text: input.text,
        is_correct: input.is_correct,
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        r#"
INSERT INTO answers (id, question_id, text, is_correct, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(answer.id)
    .bind(answer.question_id)
    .bind(&answer.text)
    .bind(answer.is_correct)
    .bind(answer.created_at)
    .bind(answer.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(id = %answer.id, question_id = %answer.question_id, "answer created");
    Ok(answer)
}

#[tracing::instrument(skip(pool))]
pub async fn update_answer(
    pool: &SqlitePool,
    id: Uuid,
    input: AnswerInput,
) -> Result<Answer, DbError> {
    let mut tx = pool.begin().await?;
    let current = fetch_answer(&mut tx, id).await?;
    if current.question_id != input.question_id {
        ensure_question(&mut tx, input.question_id).await?;
    }

    sqlx::query(
        r#"
UPDATE answers SET question_id = ?1, text = ?2, is_correct = ?3, updated_at = ?4 WHERE id = ?5
        "#,
    )
    .bind(input.question_id)
    .bind(&input.text)
    .bind(input.is_correct)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let answer = fetch_answer(&mut tx, id).await?;
    tx.commit().await?;
    Ok(answer)
}

#[tracing::instrument(skip(pool))]
pub async fn delete_answer(pool: &SqlitePool, id: Uuid) -> Result<(), DbError> {
    let deleted = sqlx::query("DELETE FROM answers WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(DbError::not_found(RESOURCE, id));
    }
    tracing::info!(%id, "answer deleted");
    Ok(())
}

#[tracing::instrument(skip_all, fields(count = answers.len()))]
pub async fn import_answers(pool: &SqlitePool, answers: Vec<Answer>) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    for answer in &answers {
        ensure_question(&mut tx, answer.question_id).await?;
        sqlx::query(
            r#"
INSERT INTO answers (id, question_id, text, is_correct, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (id) DO UPDATE SET
    question_id = excluded.question_id,
    text = excluded.text,
    is_correct = excluded.is_correct,
    updated_at = excluded.updated_at
            "#,
        )
        .bind(answer.id)
        .bind(answer.question_id)
        .bind(&answer.text)
        .bind(answer.is_correct)
        .bind(answer.created_at)
        .bind(answer.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    tracing::info!(count = answers.len(), "answers imported");
    Ok(())
}
