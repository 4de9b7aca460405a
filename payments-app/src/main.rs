//! # Payment Server
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Connect the record store (primary + replicas)
//! - Pick the instance metadata source
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payments_hex::outbound::{FixedRegion, GceMetadata};
use payments_hex::{PaymentService, ServiceConfig, inbound::HttpServer};
use payments_repo::build_store;

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("payment-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;

    // Span export only when a collector is configured
    let otel = config.otlp_endpoint.as_deref().map(init_tracer).transpose()?;
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,payments_app=debug,payments_hex=debug,payments_repo=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!(
        port = config.port,
        region_code = %config.region_code,
        replicas = config.store.replica_urls.len(),
        force_failure = config.force_failure,
        "starting payment server"
    );

    let store = build_store(&config.store).await?;

    let service = match &config.region {
        Some(region) => {
            tracing::info!(region = %region, "using fixed region");
            PaymentService::new(store, FixedRegion::new(region.clone()))
        }
        None => {
            let metadata = match &config.metadata_url {
                Some(url) => GceMetadata::with_url(url.clone()),
                None => GceMetadata::new(),
            };
            tracing::debug!(url = %metadata.url(), "using metadata server");
            PaymentService::new(store, metadata)
        }
    }
    .with_config(ServiceConfig {
        force_failure: config.force_failure,
    });

    let server = HttpServer::new(service, config.region_code.clone());
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Flush pending spans before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
