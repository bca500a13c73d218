//! # 설정 에러 처리 모듈
//!
//! 환경변수 → `Config` 변환 파이프라인에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 모든 에러는 **치명적(fatal)**입니다. 서버가 요청을 받기 전에 시작 단계에서
//! 실패하며, 부분적으로 채워진 설정은 절대 밖으로 노출되지 않습니다.
//!
//! 에러 분류:
//! - `SchemaViolation`: 필수 변수 누락, 잘못된 URL 등 (필드별로 모아서 한 번에 보고)
//! - `NumericParse`: `PORT` 값이 정수가 아님
//! - `AllowListSyntax`: `OAUTH_ALLOWED_CLIENTS` 문법 위반
//! - `DerivedUrl`, `WorkingDirectory`: 기본값 계산 중 환경 문제

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;

use serde::Serialize;
use thiserror::Error;

/// 설정 파이프라인의 모든 실패 종류
///
/// `Config::resolve`가 `Err(ConfigError)`를 반환하면 프로세스는 시작하지 않습니다.
/// 재시도나 복구는 없습니다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 스키마 검증 실패. 위반된 모든 필드를 한꺼번에 담습니다.
    #[error("{0}")]
    SchemaViolation(SchemaViolations),

    /// `PORT`가 설정되어 있지만 유효한 포트 번호가 아님
    /// (값이 없으면 기본값을 쓰지만, 잘못된 값은 에러입니다)
    #[error("PORT environment variable must be a valid integer, got {value:?}")]
    NumericParse {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// `OAUTH_ALLOWED_CLIENTS` 항목의 문법 오류
    #[error(transparent)]
    AllowListSyntax(#[from] AllowListError),

    /// 기본값으로 만든 URL이 파싱되지 않음
    #[error("derived URL {value:?} is not valid: {source}")]
    DerivedUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// 현재 작업 디렉토리를 읽을 수 없음 (상대 경로 해석 기준)
    #[error("failed to read current working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
}

/// 허용 클라이언트 목록(`clientId|uri,uri;...`) 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllowListError {
    /// `|` 구분자가 없거나, clientId 또는 URI 목록이 비어 있음
    #[error(
        "Invalid OAUTH_ALLOWED_CLIENTS entry: {entry:?}. \
         Expected format clientId|https://redirect-a,https://redirect-b"
    )]
    MalformedEntry { entry: String },

    /// URI 목록이 쉼표와 공백뿐이라 남는 redirect URI가 없음
    #[error("OAUTH_ALLOWED_CLIENTS entry for client {client_id:?} must include at least one redirect URI")]
    MissingRedirectUris { client_id: String },
}

impl AllowListError {
    /// 에러를 일으킨 원문 텍스트 (항목 전체 또는 clientId)
    pub fn offending_text(&self) -> &str {
        match self {
            AllowListError::MalformedEntry { entry } => entry,
            AllowListError::MissingRedirectUris { client_id } => client_id,
        }
    }
}

/// 필드 이름 → 위반 메시지 목록
///
/// BTreeMap을 쓰므로 필드 순서가 항상 같아서 에러 메시지가 결정적(deterministic)입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaViolations {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl SchemaViolations {
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드에 위반 메시지를 하나 추가합니다. 같은 필드에 여러 개가 쌓일 수 있습니다.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 특정 필드의 위반 메시지들. 위반이 없으면 `None`.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// 위반이 발생한 필드 이름들 (알파벳순)
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// 위반이 하나라도 있으면 `Err`로 바꿉니다.
    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::SchemaViolation(self))
        }
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 키와 메시지가 모두 문자열이라 직렬화는 실패하지 않습니다.
        let report = serde_json::to_string(&self.fields)
            .unwrap_or_else(|_| format!("{:?}", self.fields));
        write!(
            f,
            "Invalid environment configuration. Missing or invalid variables: {report}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_violations_render_as_json_report() {
        let mut violations = SchemaViolations::new();
        violations.push("AUTH0_ISSUER", "Required");
        violations.push("RESOURCE_SERVER_URL", "Invalid url");

        let message = ConfigError::SchemaViolation(violations).to_string();
        assert_eq!(
            message,
            "Invalid environment configuration. Missing or invalid variables: \
             {\"AUTH0_ISSUER\":[\"Required\"],\"RESOURCE_SERVER_URL\":[\"Invalid url\"]}"
        );
    }

    #[test]
    fn empty_violations_are_ok() {
        assert!(SchemaViolations::new().into_result().is_ok());
    }

    #[test]
    fn allow_list_error_exposes_offending_text() {
        let err = AllowListError::MalformedEntry {
            entry: "app1|".to_string(),
        };
        assert_eq!(err.offending_text(), "app1|");
        assert!(err.to_string().contains("\"app1|\""));
    }
}
