//! # OAuth Protected Resource 메타데이터 핸들러
//!
//! ## 엔드포인트
//! - `GET /.well-known/oauth-protected-resource` → RFC 9728 메타데이터 JSON
//!
//! 값은 모두 시작 시 해석된 `Config`에서 옵니다:
//! `resource_server_url`, `auth0_issuer`, `required_scopes`, `service_documentation_url`.

use axum::{extract::State, Json};

use super::AppState;
use crate::models::ProtectedResourceMetadata;

/// `GET /.well-known/oauth-protected-resource`
pub async fn protected_resource_metadata(
    State(state): State<AppState>,
) -> Json<ProtectedResourceMetadata> {
    Json(ProtectedResourceMetadata::from(state.config.as_ref()))
}
