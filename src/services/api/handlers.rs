use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Serialize;

use super::error::ApiError;
use super::extractor::SubmitPayload;
use crate::services::referral::{Export, ReferralService};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCountResponse {
    pub referral_count: u64,
}

// POST /submit
pub async fn submit(
    State(service): State<ReferralService>,
    payload: SubmitPayload,
) -> Result<&'static str, ApiError> {
    service
        .register(payload.into())
        .await
        .map_err(|e| ApiError::new(e, "Error during registration"))?;

    Ok("Registration successful")
}

// GET /referrals/{userAddress}
pub async fn referral_count(
    State(service): State<ReferralService>,
    Path(user_address): Path<String>,
) -> Result<Json<ReferralCountResponse>, ApiError> {
    let referral_count = service
        .referral_count(&user_address)
        .await
        .map_err(|e| ApiError::new(e, "Server error"))?;

    Ok(Json(ReferralCountResponse { referral_count }))
}

// GET /export-csv
pub async fn export_csv(State(service): State<ReferralService>) -> Result<Response, ApiError> {
    tracing::info!("Export CSV request received");

    let export = service
        .export_all()
        .await
        .map_err(|e| ApiError::new(e, "Error exporting CSV"))?;

    let response = match export {
        Export::Empty => "No data available to export".into_response(),
        Export::Csv { body, rows } => {
            tracing::info!(rows = rows, "Sending CSV data in response");
            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, "text/csv"),
                    (CONTENT_DISPOSITION, "attachment; filename=users.csv"),
                ],
                body,
            )
                .into_response()
        }
    };

    Ok(response)
}
