use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub graphql: GraphqlSettings,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allow any origin instead of the server's own host only.
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlSettings {
    /// Serve the GraphiQL playground on `GET /graphql`.
    pub graphiql: bool,
    pub depth_limit: usize,
    pub complexity_limit: usize,
}

impl Settings {
    /// Defaults, then `quiz-cms.toml` (or the file at `path`), then
    /// `QUIZ_CMS__SECTION__KEY` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name("quiz-cms").required(false),
        };

        Self::defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix("QUIZ_CMS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.url", "sqlite:quiz-cms.db")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("server.cors_permissive", false)?
            .set_default("graphql.graphiql", true)?
            .set_default("graphql.depth_limit", 16_i64)?
            .set_default("graphql.complexity_limit", 512_i64)
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_are_complete() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.database.url.expose_secret(), "sqlite:quiz-cms.db");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.server.bind_addr(), "127.0.0.1:8080");
        assert!(!settings.server.cors_permissive);
        assert!(settings.graphql.graphiql);
        assert_eq!(settings.graphql.depth_limit, 16);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[database]
url = "sqlite::memory:"

[server]
port = 9000

[graphql]
graphiql = false
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.database.url.expose_secret(), "sqlite::memory:");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert!(!settings.graphql.graphiql);
        assert_eq!(settings.graphql.complexity_limit, 512);
    }

    #[test]
    fn database_url_is_redacted_in_debug_output() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        let rendered = format!("{:?}", settings.database);
        assert!(!rendered.contains("quiz-cms.db"));
    }
}
