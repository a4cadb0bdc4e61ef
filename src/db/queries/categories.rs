use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::db::{Category, DbError};

const RESOURCE: &str = "category";

#[tracing::instrument(skip(pool))]
pub async fn get_all_categories(pool: &SqlitePool) -> Result<Vec<Category>, DbError> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
SELECT id, name, created_at, updated_at
FROM categories
ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

#[tracing::instrument(skip(pool))]
pub async fn get_category(pool: &SqlitePool, id: Uuid) -> Result<Category, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_category(&mut conn, id).await
}

async fn fetch_category(conn: &mut SqliteConnection, id: Uuid) -> Result<Category, DbError> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, name, created_at, updated_at
FROM categories
WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DbError::not_found(RESOURCE, id))
}

pub(crate) async fn exists(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let found = super::count(conn, "SELECT COUNT(*) FROM categories WHERE id = ?1", id).await?;
    Ok(found > 0)
}

#[tracing::instrument(skip(pool))]
pub async fn create_category(pool: &SqlitePool, name: &str) -> Result<Category, DbError> {
    let now = Utc::now();
    let category = Category {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
INSERT INTO categories (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(category.created_at)
    .bind(category.updated_at)
    .execute(pool)
    .await?;

    tracing::info!(id = %category.id, "category created");
    Ok(category)
}

#[tracing::instrument(skip(pool))]
pub async fn update_category(pool: &SqlitePool, id: Uuid, name: &str) -> Result<Category, DbError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
UPDATE categories SET name = ?1, updated_at = ?2 WHERE id = ?3
        "#,
    )
    .bind(name)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    if updated == 0 {
        return Err(DbError::not_found(RESOURCE, id));
    }

    let category = fetch_category(&mut tx, id).await?;
    tx.commit().await?;
    Ok(category)
}

/// Deletes a category that no quiz refers to anymore.
#[tracing::instrument(skip(pool))]
pub async fn delete_category(pool: &SqlitePool, id: Uuid) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let quizzes = super::count(
        &mut tx,
        "SELECT COUNT(*) FROM quizzes WHERE category_id = ?1",
        id,
    )
    .await?;
    if quizzes > 0 {
        return Err(DbError::InUse {
            resource: RESOURCE,
            id,
            count: quizzes,
            dependents: "quizzes",
        });
    }

    let deleted = sqlx::query("DELETE FROM categories WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(DbError::not_found(RESOURCE, id));
    }

    tx.commit().await?;
    tracing::info!(%id, "category deleted");
    Ok(())
}

/// Inserts categories or overwrites the ones whose id already exists.
#[tracing::instrument(skip_all, fields(count = categories.len()))]
pub async fn import_categories(
    pool: &SqlitePool,
    categories: Vec<Category>,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    for category in &categories {
        sqlx::query(
            r#"
INSERT INTO categories (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (id) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    tracing::info!(count = categories.len(), "categories imported");
    Ok(())
}
