//! # trend-mcp-server
//!
//! 인증된 MCP 서버의 설정 해석 라이브러리입니다.
//! 환경변수를 검증하여 변경되지 않는 `Config` 하나로 만들고,
//! 그 설정을 읽는 HTTP 엔드포인트(헬스체크, OAuth 메타데이터)를 제공합니다.
//!
//! - `config`: 환경변수 → `Config` 파이프라인
//! - `error`: 설정 에러 타입
//! - `models`: 응답 직렬화 구조체
//! - `routes`: axum 핸들러와 공유 상태

pub mod config;
pub mod error;
pub mod models;
pub mod routes;

pub use config::{Config, RawEnvironment, ResolveContext};
pub use error::ConfigError;
