//! # Credit Cards Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build and open the persistence adapter
//! - Create the credit cards controller
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use creditcards_hex::{CreditCardsController, inbound::HttpServer};
use creditcards_repo::{
    PayPalConfig, PayPalRestConnector, PersistenceOptions, StaticCredentialResolver,
    build_persistence,
};
use creditcards_types::Credential;

use config::{Config, PersistenceKind};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing, endpoint taken from OTEL_EXPORTER_OTLP_ENDPOINT
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("creditcards-service"), provider))
}

fn persistence_options(config: &Config) -> anyhow::Result<PersistenceOptions> {
    match config.persistence {
        PersistenceKind::Memory => Ok(PersistenceOptions::Memory),
        PersistenceKind::PayPal => {
            let settings = config
                .paypal
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("PayPal settings are missing"))?;

            let mut connector = PayPalRestConnector::default().with_timeout(settings.timeout);
            if let Some(base_url) = &settings.base_url {
                connector = connector.with_base_url(base_url.clone());
            }

            Ok(PersistenceOptions::PayPal {
                config: PayPalConfig {
                    sandbox: settings.sandbox,
                },
                credentials: Arc::new(StaticCredentialResolver::new(Credential::new(
                    settings.client_id.clone(),
                    settings.client_secret.clone(),
                ))),
                connector: Arc::new(connector),
            })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // OpenTelemetry export only when a collector is configured
    let (telemetry, otel_provider) = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(_) => {
            let (otel_tracer, otel_provider) = init_tracer()?;
            (
                Some(tracing_opentelemetry::layer().with_tracer(otel_tracer)),
                Some(otel_provider),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,creditcards_app=debug,creditcards_hex=debug,creditcards_repo=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting credit cards server on port {}", config.port);

    let persistence = build_persistence(persistence_options(&config)?).await?;
    tracing::info!("Using {} persistence", persistence.kind());

    let controller = CreditCardsController::new(persistence);

    let server = HttpServer::new(controller);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Flush pending spans before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
