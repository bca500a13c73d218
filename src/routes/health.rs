//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": "ok" }`
//!
//! 설정 해석이 실패하면 서버 자체가 뜨지 않으므로,
//! 이 엔드포인트가 응답한다는 것은 설정이 유효하다는 뜻이기도 합니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health` — 서버 상태를 확인합니다.
///
/// State가 필요 없는 핸들러입니다. 항상 HTTP 200과 고정된 JSON을 반환합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
