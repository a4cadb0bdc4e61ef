//! GraphQL schema: one query and one mutation object per entity, merged into
//! the roots.

mod answers;
mod categories;
mod errors;
mod payload;
mod questions;
mod quizzes;

use async_graphql::{extensions::Tracing, EmptySubscription, MergedObject, Schema};
use sqlx::SqlitePool;

use crate::settings::GraphqlSettings;

pub use answers::{AnswerNode, AnswerPayload};
pub use categories::{CategoryNode, CategoryPayload};
pub use questions::{DifficultyLevel, QuestionNode, QuestionPayload, QuestionType};
pub use quizzes::{QuizNode, QuizPayload};

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    categories::CategoryQuery,
    quizzes::QuizQuery,
    questions::QuestionQuery,
    answers::AnswerQuery,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    categories::CategoryMutation,
    quizzes::QuizMutation,
    questions::QuestionMutation,
    answers::AnswerMutation,
);

/// Every top-level query and mutation field the schema exposes.
pub const ROOT_FIELDS: &[&str] = &[
    "allCategories",
    "categoryById",
    "allQuiz",
    "quizById",
    "allQuestions",
    "questionById",
    "answersByQuestionId",
    "answerById",
    "createCategory",
    "updateCategory",
    "deleteCategory",
    "createQuiz",
    "updateQuiz",
    "deleteQuiz",
    "createQuestion",
    "updateQuestion",
    "deleteQuestion",
    "createAnswer",
    "updateAnswer",
    "deleteAnswer",
];

pub type QuizSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(pool: SqlitePool, settings: &GraphqlSettings) -> QuizSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(pool)
        .limit_depth(settings.depth_limit)
        .limit_complexity(settings.complexity_limit)
        .extension(Tracing)
        .finish()
}
