pub mod app;
pub mod schema;
