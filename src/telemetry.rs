use std::time::Duration;

use anyhow::{Context, Result};
use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{TonicExporterBuilder, WithExportConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config, Tracer};
use opentelemetry_sdk::{runtime, Resource};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

// The SDK logs every credential lookup and retry at info
const DEFAULT_FILTER: &str = "info,aws_config=warn,aws_smithy_runtime=warn";

pub(crate) fn init_telemetry(endpoint: Option<&str>) -> Result<()> {
    let registry = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(DEFAULT_FILTER)))
        .with(tracing_subscriber::fmt::layer().with_target(false));

    let Some(endpoint) = endpoint else {
        registry.try_init()?;
        return Ok(());
    };

    let tracer = install_tracer(endpoint)?;
    registry.with(OpenTelemetryLayer::new(tracer)).try_init()?;
    Ok(())
}

/// Installs the OTLP batch pipeline as the global tracer provider, so that
/// [`shutdown_telemetry`] flushes it.
fn install_tracer(endpoint: &str) -> Result<Tracer> {
    let service_resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ]);
    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(build_tonic_exporter(endpoint))
        .with_trace_config(Config::default().with_resource(service_resource))
        .install_batch(runtime::Tokio)
        .context("Failed to install tracer")?;

    global::set_text_map_propagator(TraceContextPropagator::new());
    global::set_tracer_provider(provider.clone());
    Ok(provider.tracer(env!("CARGO_PKG_NAME")))
}

/// Flushes spans still buffered in the batch exporter.
pub(crate) fn shutdown_telemetry() {
    global::shutdown_tracer_provider();
}

fn build_tonic_exporter(endpoint: &str) -> TonicExporterBuilder {
    opentelemetry_otlp::new_exporter()
        .tonic()
        .with_timeout(Duration::from_secs(15))
        .with_endpoint(endpoint)
}
