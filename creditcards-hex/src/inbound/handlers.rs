//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use creditcards_types::{
    AppError, CreditCardIdRequest, CreditCardRequest, CreditCardsPersistence,
    GetCreditCardsRequest,
};

use crate::CreditCardsController;

/// Request header carrying the caller's correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Application state shared across handlers.
pub struct AppState<P: CreditCardsPersistence> {
    pub controller: CreditCardsController<P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

fn correlation_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// List cards by filter and paging.
#[tracing::instrument(skip_all, fields(correlation_id = ?correlation_id(&headers)))]
pub async fn get_credit_cards<P: CreditCardsPersistence>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    Json(req): Json<GetCreditCardsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .controller
        .get_credit_cards(correlation_id(&headers), req.filter, req.paging)
        .await?;
    Ok(Json(page))
}

/// Get one card. Responds with `null` when it does not exist.
#[tracing::instrument(skip_all, fields(correlation_id = ?correlation_id(&headers), card_id = %req.card_id))]
pub async fn get_credit_card_by_id<P: CreditCardsPersistence>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    Json(req): Json<CreditCardIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .controller
        .get_credit_card_by_id(correlation_id(&headers), &req.card_id)
        .await?;
    Ok(Json(card))
}

#[tracing::instrument(skip_all, fields(correlation_id = ?correlation_id(&headers)))]
pub async fn create_credit_card<P: CreditCardsPersistence>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    Json(req): Json<CreditCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .controller
        .create_credit_card(correlation_id(&headers), req.card)
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

#[tracing::instrument(skip_all, fields(correlation_id = ?correlation_id(&headers), card_id = ?req.card.id))]
pub async fn update_credit_card<P: CreditCardsPersistence>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    Json(req): Json<CreditCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .controller
        .update_credit_card(correlation_id(&headers), req.card)
        .await?;
    Ok(Json(card))
}

/// Delete one card. Responds with the removed card, or `null`.
#[tracing::instrument(skip_all, fields(correlation_id = ?correlation_id(&headers), card_id = %req.card_id))]
pub async fn delete_credit_card_by_id<P: CreditCardsPersistence>(
    State(state): State<Arc<AppState<P>>>,
    headers: HeaderMap,
    Json(req): Json<CreditCardIdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state
        .controller
        .delete_credit_card_by_id(correlation_id(&headers), &req.card_id)
        .await?;
    Ok(Json(card))
}
