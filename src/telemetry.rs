use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref GRAPHQL_REQUESTS: CounterVec = register_counter_vec!(
        "graphql_requests_total",
        "Number of executed GraphQL requests by top-level field",
        &["field", "outcome"]
    )
    .expect("graphql_requests_total is registered once");
    pub static ref MUTATION_FAILURES: CounterVec = register_counter_vec!(
        "mutation_failures_total",
        "Number of mutations answered with success = false",
        &["mutation", "kind"]
    )
    .expect("mutation_failures_total is registered once");
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Renders every registered metric in the Prometheus text format.
pub fn render_metrics() -> Result<(String, Vec<u8>), prometheus::Error> {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let mut buf = vec![];
    encoder.encode(&prometheus::gather(), &mut buf)?;
    Ok((encoder.format_type().to_owned(), buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_rendered_metrics() {
        GRAPHQL_REQUESTS
            .with_label_values(&["allQuiz", "ok"])
            .inc();
        MUTATION_FAILURES
            .with_label_values(&["telemetryTest", "not_found"])
            .inc();

        let (content_type, body) = render_metrics().unwrap();
        let body = String::from_utf8(body).unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains("graphql_requests_total"));
        assert!(body.contains("mutation_failures_total"));
    }
}
