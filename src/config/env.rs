//! # 원시 환경변수와 스키마 검증
//!
//! 프로세스 환경에서 읽은 문자열들을 `RawEnvironment`로 모으고,
//! 선언된 형태(필수 여부, URL 형태)에 맞는지 검증하여 `ValidatedEnv`를 만듭니다.
//!
//! 검증은 첫 번째 위반에서 멈추지 않고 **모든 필드의 위반을 모아서**
//! 하나의 `SchemaViolation` 에러로 보고합니다.

use std::collections::HashMap;
use std::env;

use url::Url;

use crate::error::{ConfigError, SchemaViolations};

pub const PORT: &str = "PORT";
pub const RESOURCE_SERVER_URL: &str = "RESOURCE_SERVER_URL";
pub const AUTH0_ISSUER: &str = "AUTH0_ISSUER";
pub const JWT_AUDIENCES: &str = "JWT_AUDIENCES";
pub const REQUIRED_SCOPES: &str = "REQUIRED_SCOPES";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const VECTOR_STORE_ID: &str = "VECTOR_STORE_ID";
pub const TREND_DATA_DIR: &str = "TREND_DATA_DIR";
pub const OAUTH_ALLOWED_CLIENTS: &str = "OAUTH_ALLOWED_CLIENTS";
pub const SERVICE_DOCUMENTATION_URL: &str = "SERVICE_DOCUMENTATION_URL";

/// 이 서비스가 읽는 환경변수 전체 목록
pub const KNOWN_KEYS: [&str; 10] = [
    PORT,
    RESOURCE_SERVER_URL,
    AUTH0_ISSUER,
    JWT_AUDIENCES,
    REQUIRED_SCOPES,
    OPENAI_API_KEY,
    VECTOR_STORE_ID,
    TREND_DATA_DIR,
    OAUTH_ALLOWED_CLIENTS,
    SERVICE_DOCUMENTATION_URL,
];

/// 변수 이름 → 문자열 값 매핑
///
/// 전역 `std::env`를 직접 읽는 대신 이 값을 파이프라인에 명시적으로 넘깁니다.
/// 덕분에 테스트에서 프로세스 환경을 건드리지 않고 어떤 입력이든 만들 수 있습니다.
#[derive(Debug, Clone, Default)]
pub struct RawEnvironment {
    vars: HashMap<&'static str, String>,
    /// 값은 있지만 UTF-8이 아니어서 읽을 수 없었던 변수들
    not_unicode: Vec<&'static str>,
}

impl RawEnvironment {
    /// 프로세스 환경변수에서 알려진 키들만 읽어옵니다.
    ///
    /// `.env` 로딩(dotenvy)은 이 함수를 호출하기 전에 끝나 있어야 합니다.
    pub fn from_process() -> Self {
        // Self::default(): derive(Default)로 만든 빈 HashMap/Vec
        let mut raw = Self::default();
        for key in KNOWN_KEYS {
            // env::var는 Result<String, VarError>를 반환합니다.
            // 값이 없는 경우와 UTF-8이 아닌 경우를 구분해야 하므로 match로 나눕니다.
            match env::var(key) {
                Ok(value) => {
                    raw.vars.insert(key, value);
                }
                Err(env::VarError::NotUnicode(_)) => raw.not_unicode.push(key),
                Err(env::VarError::NotPresent) => {}
            }
        }
        raw
    }

    /// (이름, 값) 쌍으로 환경을 만듭니다. 알 수 없는 이름은 무시합니다.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            // find: 조건에 맞는 첫 원소를 Option으로 돌려줍니다.
            // KNOWN_KEYS의 &'static str을 키로 쓰므로 입력 문자열의 수명과 무관해집니다.
            if let Some(known) = KNOWN_KEYS.iter().find(|k| **k == key.as_ref()) {
                raw.vars.insert(*known, value.into());
            }
        }
        raw
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }
}

/// 파싱에 성공한 URL과 원문 문자열을 함께 보관합니다.
///
/// 원문은 audience 기본값처럼 "사용자가 쓴 그대로"가 필요한 곳에서 씁니다.
/// (`Url`은 `http://host:1`을 `http://host:1/`로 정규화하기 때문)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlVar {
    raw: String,
    url: Url,
}

impl UrlVar {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

/// 스키마 검증을 통과한 원시 필드 묶음
///
/// URL 형태 필드는 이미 파싱되어 있고, 나머지는 문자열 그대로입니다.
/// 기본값 계산과 정규화는 아직 적용되지 않은 상태입니다.
#[derive(Debug, Clone)]
pub struct ValidatedEnv {
    pub port: Option<String>,
    pub resource_server_url: Option<UrlVar>,
    pub auth0_issuer: UrlVar,
    pub jwt_audiences: Option<String>,
    pub required_scopes: Option<String>,
    pub openai_api_key: Option<String>,
    pub vector_store_id: Option<String>,
    pub trend_data_dir: Option<String>,
    pub oauth_allowed_clients: Option<String>,
    pub service_documentation_url: Option<UrlVar>,
}

/// 원시 환경을 선언된 스키마에 대해 검증합니다.
///
/// - `AUTH0_ISSUER`: 필수, URL이어야 함
/// - `RESOURCE_SERVER_URL`: 선택, 있으면 URL이어야 함
/// - `SERVICE_DOCUMENTATION_URL`: 선택, 비어 있지 않으면 URL이어야 함
/// - 나머지: 선택, 임의의 문자열
///
/// # 에러
/// 위반이 하나라도 있으면 모든 위반을 모은 `ConfigError::SchemaViolation`
pub fn validate(raw: &RawEnvironment) -> Result<ValidatedEnv, ConfigError> {
    let mut violations = SchemaViolations::new();

    // 값이 있는데 읽을 수 없었던 변수는 조용히 버리지 않고 위반으로 보고합니다.
    for key in &raw.not_unicode {
        violations.push(*key, "Expected a valid UTF-8 string");
    }

    // match guard(`if ...`): UTF-8 위반이 이미 기록된 경우 "Required"를 중복으로 넣지 않습니다.
    let auth0_issuer = match raw.get(AUTH0_ISSUER) {
        Some(value) => check_url(AUTH0_ISSUER, value, &mut violations),
        None if raw.not_unicode.contains(&AUTH0_ISSUER) => None,
        None => {
            violations.push(AUTH0_ISSUER, "Required");
            None
        }
    };

    // and_then: Some일 때만 클로저를 실행하고, 클로저가 돌려준 Option을 그대로 씁니다.
    // 클로저는 violations를 &mut로 잠깐 빌렸다가 식이 끝나면 돌려줍니다.
    let resource_server_url = raw
        .get(RESOURCE_SERVER_URL)
        .and_then(|value| check_url(RESOURCE_SERVER_URL, value, &mut violations));

    // 빈 문자열은 "설정 안 함"으로 취급합니다.
    let service_documentation_url = raw
        .get(SERVICE_DOCUMENTATION_URL)
        .filter(|value| !value.is_empty())
        .and_then(|value| check_url(SERVICE_DOCUMENTATION_URL, value, &mut violations));

    // issuer가 None이면 위 match에서 이미 위반이 기록되어 있으므로,
    // 실패 경로는 항상 모아 둔 위반 목록을 그대로 반환합니다.
    let auth0_issuer = match auth0_issuer {
        Some(issuer) if violations.is_empty() => issuer,
        _ => return Err(ConfigError::SchemaViolation(violations)),
    };

    // 클로저(closure): raw를 빌려서 &str → 소유된 String으로 복사합니다.
    let owned = |key: &str| raw.get(key).map(str::to_string);

    Ok(ValidatedEnv {
        port: owned(PORT),
        resource_server_url,
        auth0_issuer,
        jwt_audiences: owned(JWT_AUDIENCES),
        required_scopes: owned(REQUIRED_SCOPES),
        openai_api_key: owned(OPENAI_API_KEY),
        vector_store_id: owned(VECTOR_STORE_ID),
        trend_data_dir: owned(TREND_DATA_DIR),
        oauth_allowed_clients: owned(OAUTH_ALLOWED_CLIENTS),
        service_documentation_url,
    })
}

fn check_url(
    field: &'static str,
    value: &str,
    violations: &mut SchemaViolations,
) -> Option<UrlVar> {
    // Url::parse: WHATWG 규칙으로 파싱합니다. 상대 URL(`/path`)은 base가 없어 실패합니다.
    match Url::parse(value) {
        Ok(url) => Some(UrlVar {
            raw: value.to_string(),
            url,
        }),
        Err(err) => {
            violations.push(field, format!("Invalid url: {err}"));
            None
        }
    }
}
