//! HTTP 接口
//!
//! - `handlers`: 三个路由的处理函数
//! - `extractor`: `/submit` 请求体解析（JSON / 表单）
//! - `error`: 服务错误到 HTTP 响应的映射

pub mod error;
pub mod extractor;
pub mod handlers;

use axum::Router;
use axum::routing::{get, post};
use http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

pub use error::ApiError;
pub use extractor::SubmitPayload;

use crate::services::referral::ReferralService;

// 只允许固定来源，预检时回显请求头
fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::exact(allowed_origin))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// 构建路由，所有路由都经过跨域中间件
pub fn router(service: ReferralService, allowed_origin: HeaderValue) -> Router {
    Router::new()
        .route("/submit", post(handlers::submit))
        .route("/referrals/{user_address}", get(handlers::referral_count))
        .route("/export-csv", get(handlers::export_csv))
        .layer(cors_layer(allowed_origin))
        .with_state(service)
}
