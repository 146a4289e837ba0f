use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use prometheus::{Encoder, TextEncoder};

use crate::metrics::REGISTRY;

pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();

    let mut metrics = encode(&encoder, &REGISTRY.gather(), "custom");
    metrics.push_str(&encode(&encoder, &prometheus::gather(), "prometheus"));

    (StatusCode::OK, metrics).into_response()
}

fn encode(encoder: &TextEncoder, families: &[prometheus::proto::MetricFamily], name: &str) -> String {
    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(families, &mut buffer) {
        log::error!("Could not encode {name} metrics. Error: '{error}'.");
    }
    String::from_utf8(buffer).unwrap_or_else(|error| {
        log::error!("The {name} metrics are not valid UTF-8. Error: '{error}'.");
        String::default()
    })
}
