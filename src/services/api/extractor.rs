use axum::extract::{Form, FromRequest, Json, Request};
use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::services::referral::Registration;

/// `/submit` 的请求体，支持 JSON 和表单两种编码
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub twitter_username: Option<String>,
    pub user_address: Option<String>,
    pub referee_address: Option<String>,
}

impl From<SubmitPayload> for Registration {
    fn from(payload: SubmitPayload) -> Self {
        Registration {
            social_handle: payload.twitter_username,
            wallet_address: payload.user_address.unwrap_or_default(),
            referee_address: payload.referee_address,
        }
    }
}

fn is_form_encoded(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/x-www-form-urlencoded"))
}

impl<S> FromRequest<S> for SubmitPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form_encoded(&req) {
            let Form(payload) = Form::<SubmitPayload>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(payload)
        } else {
            let Json(payload) = Json::<SubmitPayload>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(payload)
        }
    }
}
