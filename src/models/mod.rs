//! # 데이터 모델 모듈
//!
//! HTTP 응답으로 내보내는 직렬화 구조체들을 정의합니다.
//! - `metadata`: OAuth 2.0 Protected Resource Metadata (RFC 9728)

pub mod metadata;

pub use metadata::*;
