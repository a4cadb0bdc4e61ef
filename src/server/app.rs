use async_graphql::http::GraphiQLSource;
use async_graphql::parser::parse_query;
use async_graphql::parser::types::{DocumentOperations, Selection};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{
    extract::{FromRef, State},
    Router,
};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::schema::{build_schema, QuizSchema, ROOT_FIELDS};
use crate::settings::{GraphqlSettings, ServerSettings};
use crate::telemetry::{render_metrics, GRAPHQL_REQUESTS};

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
    schema: QuizSchema,
}

pub fn build_router(pool: SqlitePool, graphql: &GraphqlSettings) -> Router {
    let state = AppState {
        schema: build_schema(pool.clone(), graphql),
        pool,
    };
    let graphql_route = if graphql.graphiql {
        get(graphiql).post(graphql_handler)
    } else {
        post(graphql_handler)
    };

    Router::new()
        .route("/graphql", graphql_route)
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .fallback(|| async {
            tracing::info!("Fallback");
            StatusCode::NOT_FOUND
        })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    pool: SqlitePool,
    server: &ServerSettings,
    graphql: &GraphqlSettings,
) -> anyhow::Result<()> {
    let addr = server.bind_addr();
    let app = build_router(pool, graphql).layer(cors_layer(server)?);
    let listener = TcpListener::bind(addr.as_str()).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

fn cors_layer(server: &ServerSettings) -> anyhow::Result<CorsLayer> {
    if server.cors_permissive {
        tracing::warn!("CORS: permissive mode enabled, all origins allowed");
        return Ok(CorsLayer::permissive());
    }
    let origin: HeaderValue = format!("http://{}", server.bind_addr()).parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}

async fn graphql_handler(
    State(schema): State<QuizSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner();
    let field = root_field(&request);

    let response = schema.execute(request).await;
    let outcome = if response.is_ok() { "ok" } else { "error" };
    GRAPHQL_REQUESTS.with_label_values(&[field, outcome]).inc();
    response.into()
}

/// Metric label for a request: the first top-level field of the selected
/// operation when the schema knows it, `other` for anything else.
fn root_field(request: &async_graphql::Request) -> &'static str {
    let Ok(document) = parse_query(&request.query) else {
        return "other";
    };
    let operation = match (&document.operations, request.operation_name.as_deref()) {
        (DocumentOperations::Single(operation), _) => Some(operation),
        (DocumentOperations::Multiple(operations), Some(name)) => operations.get(name),
        (DocumentOperations::Multiple(_), None) => None,
    };
    operation
        .and_then(|operation| {
            operation
                .node
                .selection_set
                .node
                .items
                .iter()
                .find_map(|selection| match &selection.node {
                    Selection::Field(field) => Some(field.node.name.node.as_str()),
                    _ => None,
                })
        })
        .and_then(|name| ROOT_FIELDS.iter().copied().find(|known| *known == name))
        .unwrap_or("other")
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health(State(pool): State<SqlitePool>) -> (StatusCode, &'static str) {
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(err) => {
            tracing::error!("Health check failed: {err}");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

async fn metrics() -> Response {
    match render_metrics() {
        Ok((content_type, buf)) => ([(header::CONTENT_TYPE, content_type)], buf).into_response(),
        Err(err) => {
            tracing::error!("Unable to encode metrics: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Unable to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Unable to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_settings(cors_permissive: bool) -> ServerSettings {
        ServerSettings {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            cors_permissive,
        }
    }

    fn request(query: &str, operation_name: Option<&str>) -> async_graphql::Request {
        let request = async_graphql::Request::new(query);
        match operation_name {
            Some(name) => request.operation_name(name),
            None => request,
        }
    }

    #[test]
    fn root_field_ignores_client_operation_names() {
        let query = "query Whatever { allCategories { id } }";
        assert_eq!(root_field(&request(query, Some("Whatever"))), "allCategories");
        assert_eq!(root_field(&request("{ quizById(id: \"x\") { id } }", None)), "quizById");
    }

    #[test]
    fn root_field_picks_the_selected_operation() {
        let query = "query A { allQuiz { id } } mutation B { deleteQuiz(id: \"x\") { success } }";
        assert_eq!(root_field(&request(query, Some("B"))), "deleteQuiz");
        assert_eq!(root_field(&request(query, None)), "other");
    }

    #[test]
    fn root_field_buckets_unknown_input() {
        assert_eq!(root_field(&request("{ __schema { types { name } } }", None)), "other");
        assert_eq!(root_field(&request("{ madeUpField }", None)), "other");
        assert_eq!(root_field(&request("not graphql {", None)), "other");
    }

    #[test]
    fn cors_layer_builds_for_both_modes() {
        assert!(cors_layer(&server_settings(false)).is_ok());
        assert!(cors_layer(&server_settings(true)).is_ok());
    }
}
