//! Logging and trace export

use miette::{IntoDiagnostic, WrapErr};
use opentelemetry::InstrumentationScope;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_resource_detectors::{HostResourceDetector, OsResourceDetector};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::resource::{EnvResourceDetector, ResourceDetector};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, TracingConfig};

/// The filter used when neither `RUST_LOG` nor `tracing.filter` is set.
const DEFAULT_FILTER: &str = "shoutbot=debug";

/// Keeps the span exporter alive until the bot exits.
#[must_use = "spans are only flushed when the guard is shut down"]
pub struct Telemetry {
    provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    /// Flushes pending spans and stops the exporter.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider
            && let Err(err) = provider.shutdown()
        {
            warn!(%err, "could not shut down trace exporter");
        }
    }
}

/// Returns a list of resource detectors to use to enrich OTel attributes.
fn otel_resource_detectors() -> Vec<Box<dyn ResourceDetector>> {
    vec![
        Box::new(EnvResourceDetector::default()),
        Box::new(OsResourceDetector),
        Box::new(HostResourceDetector::default()),
    ]
}

/// Builds a tracer provider that batches spans to the OTLP/HTTP collector.
fn tracer_provider(tracing: &TracingConfig) -> miette::Result<SdkTracerProvider> {
    let mut builder = opentelemetry_otlp::SpanExporter::builder().with_http();

    if let Some(endpoint) = &tracing.endpoint {
        builder = builder.with_endpoint(endpoint.clone());
    }

    let exporter = builder
        .build()
        .into_diagnostic()
        .wrap_err("building otlp http exporter failed")?;
    let res_detectors = otel_resource_detectors();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder_empty()
                .with_service_name(env!("CARGO_PKG_NAME"))
                .with_detectors(&res_detectors)
                .build(),
        )
        .build())
}

/// Picks the filter directives: `RUST_LOG` wins over the configured filter, which wins over
/// [`DEFAULT_FILTER`].
fn filter_directives(tracing: &TracingConfig, from_env: Option<String>) -> String {
    from_env
        .filter(|directives| !directives.trim().is_empty())
        .or_else(|| tracing.filter.clone())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs the global tracing subscriber.
///
/// The returned guard must be shut down before exiting so buffered spans reach the collector.
///
/// # Errors
///
/// Returns an error if the filter is invalid, the OTLP exporter can't be built or a subscriber
/// is already installed.
pub fn try_init(tracing: &TracingConfig) -> miette::Result<Telemetry> {
    let directives = filter_directives(tracing, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directives)
        .into_diagnostic()
        .wrap_err_with(|| format!("invalid log filter {directives:?}"))?;

    let provider = tracing.enabled.then(|| tracer_provider(tracing)).transpose()?;
    let telemetry_layer = provider.as_ref().map(|provider| {
        let scope = InstrumentationScope::builder(env!("CARGO_PKG_NAME"))
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_schema_url("https://opentelemetry.io/schema/1.0.0")
            .build();

        tracing_opentelemetry::layer().with_tracer(provider.tracer_with_scope(scope))
    });

    let stdout_layer = match tracing.format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry_layer)
        .with(stdout_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("could not init registry")?;

    info!(
        format = ?tracing.format,
        otlp = tracing.enabled,
        filter = %directives,
        "tracing initialized"
    );

    Ok(Telemetry { provider })
}
