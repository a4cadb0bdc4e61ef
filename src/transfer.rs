//! CSV export and import of the whole content tree.
//!
//! A dump is a directory holding one file per table. Import upserts by id in
//! foreign-key order, so a dump can be loaded into an empty database or over
//! an existing one.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::{answers, categories, questions, quizzes};
use crate::db::{Answer, Category, Question, Quiz};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUIZZES_FILE: &str = "quizzes.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";
pub const ANSWERS_FILE: &str = "answers.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let all_categories = categories::get_all_categories(pool).await?;
    let all_quizzes = quizzes::get_all_quizzes(pool).await?;
    let all_questions = questions::get_all_questions(pool).await?;
    let all_answers = answers::get_all_answers(pool).await?;
    if !path.exists() {
        std::fs::create_dir_all(path)?
    }
    tracing::info!(
        categories = all_categories.len(),
        quizzes = all_quizzes.len(),
        questions = all_questions.len(),
        answers = all_answers.len(),
        "Exporting to {}",
        path.display()
    );
    write_to(&path.join(CATEGORIES_FILE), all_categories)?;
    write_to(&path.join(QUIZZES_FILE), all_quizzes)?;
    write_to(&path.join(QUESTIONS_FILE), all_questions)?;
    write_to(&path.join(ANSWERS_FILE), all_answers)?;
    Ok(())
}

pub async fn import_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let new_categories: Vec<Category> = read_from(&path.join(CATEGORIES_FILE))?;
    let new_quizzes: Vec<Quiz> = read_from(&path.join(QUIZZES_FILE))?;
    let new_questions: Vec<Question> = read_from(&path.join(QUESTIONS_FILE))?;
    let new_answers: Vec<Answer> = read_from(&path.join(ANSWERS_FILE))?;

    categories::import_categories(pool, new_categories).await?;
    quizzes::import_quizzes(pool, new_quizzes).await?;
    questions::import_questions(pool, new_questions).await?;
    answers::import_answers(pool, new_answers).await?;
    Ok(())
}
