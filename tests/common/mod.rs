#![allow(dead_code)]

use quiz_cms::db::queries::{answers, categories, questions, quizzes};
use quiz_cms::db::{self, Answer, AnswerInput, Category, Question, QuestionInput, Quiz};
use sqlx::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
    let pool = db::connect_in_memory().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

/// A category holding one quiz with one question and two answers.
pub struct Seeded {
    pub category: Category,
    pub quiz: Quiz,
    pub question: Question,
    pub answers: Vec<Answer>,
}

pub async fn seed(pool: &SqlitePool) -> Seeded {
    let category = categories::create_category(pool, "Rust").await.unwrap();
    let quiz = quizzes::create_quiz(pool, "Ownership", category.id)
        .await
        .unwrap();
    let question = questions::create_question(
        pool,
        QuestionInput {
            quiz_id: quiz.id,
            title: "Which type owns its heap buffer?".to_owned(),
            kind: Default::default(),
            difficulty: Default::default(),
            is_active: true,
        },
    )
    .await
    .unwrap();

    let mut seeded_answers = Vec::new();
    for (text, is_correct) in [("String", true), ("&str", false)] {
        let answer = answers::create_answer(
            pool,
            AnswerInput {
                question_id: question.id,
                text: text.to_owned(),
                is_correct,
            },
        )
        .await
        .unwrap();
        seeded_answers.push(answer);
    }

    Seeded {
        category,
        quiz,
        question,
        answers: seeded_answers,
    }
}
