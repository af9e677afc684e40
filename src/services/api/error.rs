use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::services::referral::ReferralError;

/// 路由层错误，携带该接口对内部错误使用的提示文本
#[derive(Debug)]
pub struct ApiError {
    pub error: ReferralError,
    pub internal_message: &'static str,
}

impl ApiError {
    pub fn new(error: ReferralError, internal_message: &'static str) -> Self {
        Self {
            error,
            internal_message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.error {
            ReferralError::DuplicateUser => (StatusCode::BAD_REQUEST, self.error.to_string()),
            ReferralError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ReferralError::NotFound { .. } => (StatusCode::NOT_FOUND, "User not found".to_string()),
            ReferralError::Store(e) => {
                tracing::error!(error = %e, "Creating internal error response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.internal_message.to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
