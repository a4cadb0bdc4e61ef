use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How many answers of a question may be picked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[repr(i64)]
pub enum QuestionKind {
    #[default]
    MultipleChoice = 0,
    SingleChoice = 1,
}

/// Difficulty tiers, ordered from easiest to hardest.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[repr(i64)]
pub enum Difficulty {
    #[default]
    Fundamental = 0,
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
    Expert = 4,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub title: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub text: String,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every writable question field; used for both create and full overwrite.
#[derive(Debug, Clone)]
pub struct QuestionInput {
    pub quiz_id: Uuid,
    pub title: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub question_id: Uuid,
    pub text: String,
    pub is_correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_tiers_are_ordered() {
        let tiers = [
            Difficulty::Fundamental,
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
            Difficulty::Expert,
        ];
        assert!(tiers.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(Difficulty::default(), Difficulty::Fundamental);
    }

    #[test]
    fn discriminants_match_stored_values() {
        assert_eq!(QuestionKind::MultipleChoice as i64, 0);
        assert_eq!(QuestionKind::SingleChoice as i64, 1);
        assert_eq!(Difficulty::Expert as i64, 4);
    }
}
