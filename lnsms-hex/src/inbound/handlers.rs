//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use lnsms_types::{AppError, ClaimRequest, Ledger, LightningWallet, RequestInvoiceRequest};

use crate::RelayService;

/// Application state shared across handlers.
pub struct AppState<L: Ledger, W: LightningWallet> {
    pub service: RelayService<L, W>,
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
        let (status, message) = match &self.0 {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidCode => (StatusCode::BAD_REQUEST, self.0.to_string()),
            AppError::PayoutFailed | AppError::PayoutIndeterminate => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }
            // Infrastructure detail stays in the logs, not the response.
            AppError::Provider(_) | AppError::Persistence(_) | AppError::Internal(_) => {
                tracing::error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Serves the generated OpenAPI document.
pub async fn openapi_spec() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(crate::openapi::ApiDoc::openapi())
}

/// Create an invoice that relays to a phone number once paid.
#[tracing::instrument(skip(state, req), fields(number = %req.number))]
pub async fn request_invoice<L: Ledger, W: LightningWallet>(
    State(state): State<Arc<AppState<L, W>>>,
    Json(req): Json<RequestInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = state.service.request_invoice(req).await?;
    Ok(Json(invoice))
}

/// Redeem a claim code into a payout.
#[tracing::instrument(skip(state, req))]
pub async fn claim<L: Ledger, W: LightningWallet>(
    State(state): State<Arc<AppState<L, W>>>,
    Json(req): Json<ClaimRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.claim(req).await?;
    Ok("ok")
}
