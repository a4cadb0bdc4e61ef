use async_graphql::{ComplexObject, Context, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::categories::CategoryNode;
use super::errors::query_error;
use super::payload::mutation_payload;
use super::questions::QuestionNode;
use crate::db::{self, queries::categories, queries::questions, queries::quizzes};

const DEFAULT_TITLE: &str = "New Quiz";

/// A named collection of questions under one category.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Quiz", complex)]
pub struct QuizNode {
    pub id: Uuid,
    pub title: String,
    #[graphql(skip)]
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<db::Quiz> for QuizNode {
    fn from(quiz: db::Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            category_id: quiz.category_id,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

#[ComplexObject]
impl QuizNode {
    async fn category(&self, ctx: &Context<'_>) -> Result<CategoryNode> {
        let pool = ctx.data::<SqlitePool>()?;
        let category = categories::get_category(pool, self.category_id)
            .await
            .map_err(query_error)?;
        Ok(category.into())
    }

    async fn questions(&self, ctx: &Context<'_>) -> Result<Vec<QuestionNode>> {
        let pool = ctx.data::<SqlitePool>()?;
        let questions = questions::get_questions_for_quiz(pool, self.id)
            .await
            .map_err(query_error)?;
        Ok(questions.into_iter().map(QuestionNode::from).collect())
    }
}

#[derive(Default)]
pub struct QuizQuery;

#[Object]
impl QuizQuery {
    /// Every quiz, in storage order.
    async fn all_quiz(&self, ctx: &Context<'_>) -> Result<Vec<QuizNode>> {
        let pool = ctx.data::<SqlitePool>()?;
        let quizzes = quizzes::get_all_quizzes(pool).await.map_err(query_error)?;
        Ok(quizzes.into_iter().map(QuizNode::from).collect())
    }

    async fn quiz_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<QuizNode> {
        let pool = ctx.data::<SqlitePool>()?;
        let quiz = quizzes::get_quiz(pool, id).await.map_err(query_error)?;
        Ok(quiz.into())
    }
}

mutation_payload!(
    /// Outcome of a quiz mutation.
    QuizPayload { quiz: QuizNode }
);

#[derive(Default)]
pub struct QuizMutation;

#[Object]
impl QuizMutation {
    /// The category has to exist; there is no fallback category.
    async fn create_quiz(
        &self,
        ctx: &Context<'_>,
        #[graphql(validator(max_length = 255))] title: Option<String>,
        category_id: Uuid,
    ) -> Result<QuizPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        let title = title.unwrap_or_else(|| DEFAULT_TITLE.to_owned());
        Ok(match quizzes::create_quiz(pool, &title, category_id).await {
            Ok(quiz) => QuizPayload::applied(Some(quiz.into())),
            Err(err) => QuizPayload::rejected("createQuiz", err),
        })
    }

    async fn update_quiz(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        #[graphql(validator(max_length = 255))] title: String,
        category_id: Uuid,
    ) -> Result<QuizPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        Ok(match quizzes::update_quiz(pool, id, &title, category_id).await {
            Ok(quiz) => QuizPayload::applied(Some(quiz.into())),
            Err(err) => QuizPayload::rejected("updateQuiz", err),
        })
    }

    /// Also deletes the quiz's questions and their answers.
    async fn delete_quiz(&self, ctx: &Context<'_>, id: Uuid) -> Result<QuizPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        Ok(match quizzes::delete_quiz(pool, id).await {
            Ok(()) => QuizPayload::applied(None),
            Err(err) => QuizPayload::rejected("deleteQuiz", err),
        })
    }
}
