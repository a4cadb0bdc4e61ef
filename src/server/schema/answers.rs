use async_graphql::{ComplexObject, Context, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::errors::query_error;
use super::payload::mutation_payload;
use super::questions::QuestionNode;
use crate::db::{self, queries::answers, queries::questions, AnswerInput};

/// One candidate response to a question.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Answer", complex)]
pub struct AnswerNode {
    pub id: Uuid,
    pub text: String,
    pub is_correct: bool,
    #[graphql(skip)]
    pub question_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<db::Answer> for AnswerNode {
    fn from(answer: db::Answer) -> Self {
        Self {
            id: answer.id,
            text: answer.text,
            is_correct: answer.is_correct,
            question_id: answer.question_id,
            created_at: answer.created_at,
            updated_at: answer.updated_at,
        }
    }
}

#[ComplexObject]
impl AnswerNode {
    async fn question(&self, ctx: &Context<'_>) -> Result<QuestionNode> {
        let pool = ctx.data::<SqlitePool>()?;
        let question = questions::get_question(pool, self.question_id)
            .await
            .map_err(query_error)?;
        Ok(question.into())
    }
}

#[derive(Default)]
pub struct AnswerQuery;

#[Object]
impl AnswerQuery {
    /// Answers of the question, empty when it has none. Unknown question ids
    /// are reported as `NOT_FOUND`.
    async fn answers_by_question_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<Vec<AnswerNode>> {
        let pool = ctx.data::<SqlitePool>()?;
        let answers = answers::get_answers_for_question(pool, id)
            .await
            .map_err(query_error)?;
        Ok(answers.into_iter().map(AnswerNode::from).collect())
    }

    async fn answer_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<AnswerNode> {
        let pool = ctx.data::<SqlitePool>()?;
        let answer = answers::get_answer(pool, id).await.map_err(query_error)?;
        Ok(answer.into())
    }
}

mutation_payload!(
    /// Outcome of an answer mutation.
    AnswerPayload { answer: AnswerNode }
);

#[derive(Default)]
pub struct AnswerMutation;

#[Object]
impl AnswerMutation {
    async fn create_answer(
        &self,
        ctx: &Context<'_>,
        question_id: Uuid,
        text: String,
        is_correct: bool,
    ) -> Result<AnswerPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        let input = AnswerInput {
            question_id,
            text,
            is_correct,
        };
        Ok(match answers::create_answer(pool, input).await {
            Ok(answer) => AnswerPayload::applied(Some(answer.into())),
            Err(err) => AnswerPayload::rejected("createAnswer", err),
        })
    }

    async fn update_answer(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        question_id: Uuid,
        text: String,
        is_correct: bool,
    ) -> Result<AnswerPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        let input = AnswerInput {
            question_id,
            text,
            is_correct,
        };
        Ok(match answers::update_answer(pool, id, input).await {
            Ok(answer) => AnswerPayload::applied(Some(answer.into())),
            Err(err) => AnswerPayload::rejected("updateAnswer", err),
        })
    }

    async fn delete_answer(&self, ctx: &Context<'_>, id: Uuid) -> Result<AnswerPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        Ok(match answers::delete_answer(pool, id).await {
            Ok(()) => AnswerPayload::applied(None),
            Err(err) => AnswerPayload::rejected("deleteAnswer", err),
        })
    }
}
