//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use creditcards_types::{CreditCardsPersistence, Openable};

use super::handlers::{self, AppState};
use crate::CreditCardsController;

/// HTTP Server for the v1 credit cards API.
pub struct HttpServer<P: CreditCardsPersistence> {
    state: Arc<AppState<P>>,
}

impl<P: CreditCardsPersistence> HttpServer<P> {
    /// Creates a new HTTP server with the given controller.
    pub fn new(controller: CreditCardsController<P>) -> Self {
        Self {
            state: Arc::new(AppState { controller }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/v1/credit_cards/get_credit_cards",
                post(handlers::get_credit_cards::<P>),
            )
            .route(
                "/v1/credit_cards/get_credit_card_by_id",
                post(handlers::get_credit_card_by_id::<P>),
            )
            .route(
                "/v1/credit_cards/create_credit_card",
                post(handlers::create_credit_card::<P>),
            )
            .route(
                "/v1/credit_cards/update_credit_card",
                post(handlers::update_credit_card::<P>),
            )
            .route(
                "/v1/credit_cards/delete_credit_card_by_id",
                post(handlers::delete_credit_card_by_id::<P>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    ///
    /// The persistence is closed once the server has drained.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.state.controller.persistence().close(None).await?;
        tracing::info!("Persistence closed");

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
