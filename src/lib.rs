//! Quiz content management backend: categories, quizzes, questions and
//! answers stored in SQLite and served over GraphQL.

pub mod db;
pub mod server;
pub mod settings;
pub mod telemetry;
pub mod transfer;
