//! # 라우트 핸들러 모듈
//!
//! 해석된 `Config`를 읽는 HTTP 핸들러들입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `metadata`: OAuth Protected Resource 메타데이터

pub mod health;
pub mod metadata;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;

pub use health::*;
pub use metadata::*;

/// RFC 9728이 정한 메타데이터 경로
pub const PROTECTED_RESOURCE_METADATA_PATH: &str = "/.well-known/oauth-protected-resource";

/// 애플리케이션 공유 상태
///
/// `Config`는 시작 시 한 번 만들어진 뒤 `Arc`로 공유되며, 누구도 수정하지 않습니다.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// 전체 라우터를 만듭니다.
///
/// CORS는 모든 출처(origin)에 열려 있습니다.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(PROTECTED_RESOURCE_METADATA_PATH, get(protected_resource_metadata))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
