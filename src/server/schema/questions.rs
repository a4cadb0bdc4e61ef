use async_graphql::{ComplexObject, Context, Enum, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::answers::AnswerNode;
use super::errors::query_error;
use super::payload::mutation_payload;
use super::quizzes::QuizNode;
use crate::db::{self, queries::answers, queries::questions, queries::quizzes, QuestionInput};

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuestionType {
    /// Any number of answers may be correct.
    MultipleChoice,
    /// Exactly one answer is correct.
    SingleChoice,
}

impl From<db::QuestionKind> for QuestionType {
    fn from(kind: db::QuestionKind) -> Self {
        match kind {
            db::QuestionKind::MultipleChoice => Self::MultipleChoice,
            db::QuestionKind::SingleChoice => Self::SingleChoice,
        }
    }
}

impl From<QuestionType> for db::QuestionKind {
    fn from(kind: QuestionType) -> Self {
        match kind {
            QuestionType::MultipleChoice => Self::MultipleChoice,
            QuestionType::SingleChoice => Self::SingleChoice,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "Difficulty")]
pub enum DifficultyLevel {
    Fundamental,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl From<db::Difficulty> for DifficultyLevel {
    fn from(difficulty: db::Difficulty) -> Self {
        match difficulty {
            db::Difficulty::Fundamental => Self::Fundamental,
            db::Difficulty::Beginner => Self::Beginner,
            db::Difficulty::Intermediate => Self::Intermediate,
            db::Difficulty::Advanced => Self::Advanced,
            db::Difficulty::Expert => Self::Expert,
        }
    }
}

impl From<DifficultyLevel> for db::Difficulty {
    fn from(difficulty: DifficultyLevel) -> Self {
        match difficulty {
            DifficultyLevel::Fundamental => Self::Fundamental,
            DifficultyLevel::Beginner => Self::Beginner,
            DifficultyLevel::Intermediate => Self::Intermediate,
            DifficultyLevel::Advanced => Self::Advanced,
            DifficultyLevel::Expert => Self::Expert,
        }
    }
}

/// A single quiz item with a type and a difficulty tier.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Question", complex)]
pub struct QuestionNode {
    pub id: Uuid,
    pub title: String,
    pub question_type: QuestionType,
    pub difficulty: DifficultyLevel,
    pub is_active: bool,
    #[graphql(skip)]
    pub quiz_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<db::Question> for QuestionNode {
    fn from(question: db::Question) -> Self {
        Self {
            id: question.id,
            title: question.title,
            question_type: question.kind.into(),
            difficulty: question.difficulty.into(),
            is_active: question.is_active,
            quiz_id: question.quiz_id,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

#[ComplexObject]
impl QuestionNode {
    async fn quiz(&self, ctx: &Context<'_>) -> Result<QuizNode> {
        let pool = ctx.data::<SqlitePool>()?;
        let quiz = quizzes::get_quiz(pool, self.quiz_id)
            .await
            .map_err(query_error)?;
        Ok(quiz.into())
    }

    async fn answers(&self, ctx: &Context<'_>) -> Result<Vec<AnswerNode>> {
        let pool = ctx.data::<SqlitePool>()?;
        let answers = answers::get_answers_for_question(pool, self.id)
            .await
            .map_err(query_error)?;
        Ok(answers.into_iter().map(AnswerNode::from).collect())
    }
}

#[derive(Default)]
pub struct QuestionQuery;

#[Object]
impl QuestionQuery {
    async fn all_questions(&self, ctx: &Context<'_>) -> Result<Vec<QuestionNode>> {
        let pool = ctx.data::<SqlitePool>()?;
        let questions = questions::get_all_questions(pool)
            .await
            .map_err(query_error)?;
        Ok(questions.into_iter().map(QuestionNode::from).collect())
    }

    async fn question_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<QuestionNode> {
        let pool = ctx.data::<SqlitePool>()?;
        let question = questions::get_question(pool, id)
            .await
            .map_err(query_error)?;
        Ok(question.into())
    }
}

mutation_payload!(
    /// Outcome of a question mutation.
    QuestionPayload { question: QuestionNode }
);

#[derive(Default)]
pub struct QuestionMutation;

#[Object]
impl QuestionMutation {
    async fn create_question(
        &self,
        ctx: &Context<'_>,
        quiz_id: Uuid,
        #[graphql(validator(max_length = 255))] title: String,
        question_type: Option<QuestionType>,
        difficulty: Option<DifficultyLevel>,
        is_active: bool,
    ) -> Result<QuestionPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        let input = QuestionInput {
            quiz_id,
            title,
            kind: question_type.map(Into::into).unwrap_or_default(),
            difficulty: difficulty.map(Into::into).unwrap_or_default(),
            is_active,
        };
        Ok(match questions::create_question(pool, input).await {
            Ok(question) => QuestionPayload::applied(Some(question.into())),
            Err(err) => QuestionPayload::rejected("createQuestion", err),
        })
    }

    /// Overwrites every field of the question.
    async fn update_question(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        quiz_id: Uuid,
        #[graphql(validator(max_length = 255))] title: String,
        question_type: QuestionType,
        difficulty: DifficultyLevel,
        is_active: bool,
    ) -> Result<QuestionPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        let input = QuestionInput {
            quiz_id,
            title,
            kind: question_type.into(),
            difficulty: difficulty.into(),
            is_active,
        };
        Ok(match questions::update_question(pool, id, input).await {
            Ok(question) => QuestionPayload::applied(Some(question.into())),
            Err(err) => QuestionPayload::rejected("updateQuestion", err),
        })
    }

    /// Also deletes the question's answers.
    async fn delete_question(&self, ctx: &Context<'_>, id: Uuid) -> Result<QuestionPayload> {
        let pool = ctx.data::<SqlitePool>()?;
        Ok(match questions::delete_question(pool, id).await {
            Ok(()) => QuestionPayload::applied(None),
            Err(err) => QuestionPayload::rejected("deleteQuestion", err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_map_both_ways() {
        for kind in [db::QuestionKind::MultipleChoice, db::QuestionKind::SingleChoice] {
            assert_eq!(db::QuestionKind::from(QuestionType::from(kind)), kind);
        }
        for difficulty in [
            db::Difficulty::Fundamental,
            db::Difficulty::Beginner,
            db::Difficulty::Intermediate,
            db::Difficulty::Advanced,
            db::Difficulty::Expert,
        ] {
            assert_eq!(
                db::Difficulty::from(DifficultyLevel::from(difficulty)),
                difficulty
            );
        }
    }
}
