use async_graphql::{ComplexObject, Context, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::errors::query_error;
use super::payload::mutation_payload;
use super::quizzes::QuizNode;
use crate::db::{self, queries::categories, queries::quizzes};

/// Top-level grouping for quizzes.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Category", complex)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<db::Category> for CategoryNode {
    fn from(category: db::Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[ComplexObject]
impl CategoryNode {
    /// Quizzes filed under this category.
    async fn quizzes(&self, ctx: &Context<'_>) -> Result<Vec<QuizNode>> {
        let pool = ctx.data::<SqlitePool>()?;
        let quizzes = quizzes::get_quizzes_for_category(pool, self.id)
            .await
            .map_err(query_error)?;
        Ok(quizzes.into_iter().map(QuizNode::from).collect())
    }
}

#[derive(Default)]
pub struct CategoryQuery;

#[Object]
impl CategoryQuery {
    async fn all_categories(&self, ctx: &Context<'_>) -> Result<Vec<CategoryNode>> {
        let pool = ctx.data::<SqlitePool>()?;
        let categories = categories::get_all_categories(pool)
            .await
            .map_err(query_error)?;
        Ok(categories.into_iter().map(CategoryNode::from).collect())
    }

    async fn category_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<CategoryNode> {
        let pool = ctx.data::<SqlitePool>()?;
        let category = categories::get_category(pool, id)
            .await
            .map_err(query_error)?;
        Ok(category.into())
    }
}

mutation_payload!(
    /// Outcome of a category mutation.
    CategoryPayload { category: CategoryNode }
);

#[derive(Default)]
pub struct CategoryMutation;

#[Object]
impl CategoryMutation {
    async fn create_category(
        &self,
        ctx: &Context<'_>,
        #[graphql(validator(max_length = 255))] name: String,
    ) -> Result<CategoryPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        Ok(match categories::create_category(pool, &name).await {
            Ok(category) => CategoryPayload::applied(Some(category.into())),
            Err(err) => CategoryPayload::rejected("createCategory", err),
        })
    }

    async fn update_category(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        #[graphql(validator(max_length = 255))] name: String,
    ) -> Result<CategoryPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        Ok(match categories::update_category(pool, id, &name).await {
            Ok(category) => CategoryPayload::applied(Some(category.into())),
            Err(err) => CategoryPayload::rejected("updateCategory", err),
        })
    }

    /// Fails while quizzes still belong to the category.
    async fn delete_category(&self, ctx: &Context<'_>, id: Uuid) -> Result<CategoryPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        Ok(match categories::delete_category(pool, id).await {
            Ok(()) => CategoryPayload::applied(None),
            Err(err) => CategoryPayload::rejected("deleteCategory", err),
        })
    }
}
