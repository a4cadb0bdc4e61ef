use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::quizzes;
use crate::db::{DbError, Question, QuestionInput};

const RESOURCE: &str = "question";

#[tracing::instrument(skip(pool))]
pub async fn get_all_questions(pool: &SqlitePool) -> Result<Vec<Question>, DbError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, quiz_id, title, kind, difficulty, is_active, created_at, updated_at
FROM questions
ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

#[tracing::instrument(skip(pool))]
pub async fn get_questions_for_quiz(
    pool: &SqlitePool,
    quiz_id: Uuid,
) -> Result<Vec<Question>, DbError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, quiz_id, title, kind, difficulty, is_active, created_at, updated_at
FROM questions
WHERE quiz_id = ?1
ORDER BY rowid
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

#[tracing::instrument(skip(pool))]
pub async fn get_question(pool: &SqlitePool, id: Uuid) -> Result<Question, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_question(&mut conn, id).await
}

async fn fetch_question(conn: &mut SqliteConnection, id: Uuid) -> Result<Question, DbError> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, quiz_id, title, kind, difficulty, is_active, created_at, updated_at
FROM questions
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DbError::not_found(RESOURCE, id))
}

pub(crate) async fn exists(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let found = super::count(conn, "SELECT COUNT(*) FROM questions WHERE id = ?1", id).await?;
    Ok(found > 0)
}

async fn ensure_quiz(conn: &mut SqliteConnection, quiz_id: Uuid) -> Result<(), DbError> {
    if quizzes::exists(conn, quiz_id).await? {
        Ok(())
    } else {
        Err(DbError::not_found("quiz", quiz_id))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn create_question(pool: &SqlitePool, input: QuestionInput) -> Result<Question, DbError> {
    let mut tx = pool.begin().await?;
    ensure_quiz(&mut tx, input.quiz_id).await?;

    let now = Utc::now();
    let question = Question {
        id: Uuid::new_v4(),
        quiz_id: input.quiz_id,
        title: input.title,
        kind: input.kind,
        difficulty: input.difficulty,
        is_active: input.is_active,
        created_at: now,
        updated_at: now,
    };
    sqlx::query(
        r#"
INSERT INTO questions (id, quiz_id, title, kind, difficulty, is_active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(question.id)
    .bind(question.quiz_id)
    .bind(&question.title)
    .bind(question.kind)
    .bind(question.difficulty)
    .bind(question.is_active)
    .bind(question.created_at)
    .bind(question.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(id = %question.id, quiz_id = %question.quiz_id, "question created");
    Ok(question)
}

#[tracing::instrument(skip(pool))]
pub async fn update_question(
    pool: &SqlitePool,
    id: Uuid,
    input: QuestionInput,
) -> Result<Question, DbError> {
    let mut tx = pool.begin().await?;
    if !exists(&mut tx, id).await? {
        return Err(DbError::not_found(RESOURCE, id));
    }
    ensure_quiz(&mut tx, input.quiz_id).await?;

    sqlx::query(
        r#"
UPDATE questions
SET quiz_id = ?1, title = ?2, kind = ?3, difficulty = ?4, is_active = ?5, updated_at = ?6
WHERE id = ?7
        "#,
    )
    .bind(input.quiz_id)
    .bind(&input.title)
    .bind(input.kind)
    .bind(input.difficulty)
    .bind(input.is_active)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let question = fetch_question(&mut tx, id).await?;
    tx.commit().await?;
    Ok(question)
}

/// Deletes a question together with its answers.
#[tracing::instrument(skip(pool))]
pub async fn delete_question(pool: &SqlitePool, id: Uuid) -> Result<(), DbError> {
    let deleted = sqlx::query("DELETE FROM questions WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(DbError::not_found(RESOURCE, id));
    }
    tracing::info!(%id, "question deleted");
    Ok(())
}

#[tracing::instrument(skip_all, fields(count = questions.len()))]
pub async fn import_questions(
    pool: &SqlitePool,
    questions: Vec<Question>,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    for question in &questions {
        ensure_quiz(&mut tx, question.quiz_id).await?;
        sqlx::query(
            r#"
INSERT INTO questions (id, quiz_id, title, kind, difficulty, is_active, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
ON CONFLICT (id) DO UPDATE SET
    quiz_id = excluded.quiz_id,
    title = excluded.title,
    kind = excluded.kind,
    difficulty = excluded.difficulty,
    is_active = excluded.is_active,
    updated_at = excluded.updated_at
            "#,
        )
        .bind(question.id)
        .bind(question.quiz_id)
        .bind(&question.title)
        .bind(question.kind)
        .bind(question.difficulty)
        .bind(question.is_active)
        .bind(question.created_at)
        .bind(question.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    tracing::info!(count = questions.len(), "questions imported");
    Ok(())
}
