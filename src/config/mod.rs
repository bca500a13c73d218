//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 문자열뿐인 환경변수를 한 번 검증하여, 변경되지 않는(immutable) `Config` 하나로 만듭니다.
//! 서버 시작 시 한 번만 실행되고, 실패하면 서버는 시작하지 않습니다.
//!
//! 파이프라인 (항상 이 순서로, 되돌아가지 않음):
//! 1. `env::validate` — 스키마 검증 (모든 필드 위반을 모아서 보고)
//! 2. `defaults` — 포트, issuer, 데이터 디렉토리, audience 기본값/정규화
//! 3. `clients` — `OAUTH_ALLOWED_CLIENTS` 문법 파싱
//! 4. 최종 조립 — 추가 검증 없이 `Config`로 묶기
//!
//! 설정 항목:
//! - `AUTH0_ISSUER` (필수): 토큰 발급자 URL
//! - `PORT`: 서버 포트 번호 (기본값: 8788)
//! - `RESOURCE_SERVER_URL`: 이 서버의 공개 URL (기본값: `http://localhost:{port}`)
//! - `JWT_AUDIENCES`: 허용 audience 목록, 쉼표 구분
//! - `OAUTH_ALLOWED_CLIENTS`: `clientId|uri,uri;clientId|uri`
//! - `TREND_DATA_DIR`: 트렌드 데이터 디렉토리
//! - `OPENAI_API_KEY`, `VECTOR_STORE_ID`: 벡터 스토어 접근 정보
//! - `SERVICE_DOCUMENTATION_URL`: 서비스 문서 URL
//! - `REQUIRED_SCOPES`: 읽기만 하고 무시됩니다 (`required_scopes`는 항상 비어 있음)

pub mod clients;
pub mod defaults;
pub mod env;

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ConfigError;

pub use clients::{AllowedClientRegistry, OAuthClientEntry};
pub use env::RawEnvironment;

/// 기본 경로 계산과 상대 경로 해석에 쓰는 기준 디렉토리들
///
/// 설정 모듈 자신의 위치를 런타임에 추측하는 대신, 기준 경로를 명시적으로 주입합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    /// 기본 `TREND_DATA_DIR`의 기준 디렉토리
    pub anchor: PathBuf,
    /// 상대 경로로 주어진 `TREND_DATA_DIR`의 해석 기준
    pub working_dir: PathBuf,
}

impl ResolveContext {
    pub fn new(anchor: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            anchor: anchor.into(),
            working_dir: working_dir.into(),
        }
    }

    /// 실제 프로세스용 컨텍스트
    ///
    /// 앵커는 크레이트 루트의 부모 디렉토리(`CARGO_MANIFEST_DIR/..`)로,
    /// `src/` 아래 설정 모듈 파일에서 세 단계 위에 해당합니다.
    /// 컴파일 시점에 고정되므로 현재 작업 디렉토리와 무관합니다.
    ///
    /// # 에러
    /// 현재 작업 디렉토리를 읽을 수 없으면 `ConfigError::WorkingDirectory`
    pub fn from_process() -> Result<Self, ConfigError> {
        let working_dir = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
        Ok(Self::new(default_anchor(), working_dir))
    }
}

/// 크레이트 루트의 부모 디렉토리
pub fn default_anchor() -> PathBuf {
    let crate_root = Path::new(env!("CARGO_MANIFEST_DIR"));
    crate_root
        .parent()
        .unwrap_or(crate_root)
        .to_path_buf()
}

/// 검증이 끝난 애플리케이션 전체 설정
///
/// 서버 시작 시 한 번 만들어진 후 `Arc`로 감싸 모든 핸들러가 읽기 전용으로 공유합니다.
/// 필드는 비공개이고 읽기 메서드만 있으므로, 생성 후에는 변경할 수 없습니다.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    port: u16,
    auth0_issuer: String,
    resource_server_url: Url,
    openai_api_key: Option<String>,
    vector_store_id: Option<String>,
    trend_data_dir: PathBuf,
    required_scopes: Vec<String>,
    expected_audiences: Vec<String>,
    allowed_oauth_clients: AllowedClientRegistry,
    service_documentation_url: Option<Url>,
}

impl Config {
    /// 프로세스 환경변수와 현재 디렉토리에서 설정을 만듭니다.
    ///
    /// `.env` 파일 로딩은 호출하는 쪽(main)에서 먼저 끝내야 합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let context = ResolveContext::from_process()?;
        Self::resolve(&RawEnvironment::from_process(), &context)
    }

    /// 원시 환경 → 검증된 `Config` 순수 변환
    ///
    /// 어느 단계에서든 실패하면 즉시 중단하고 에러를 반환합니다.
    /// 부분적으로 채워진 설정은 만들어지지 않습니다.
    pub fn resolve(raw: &RawEnvironment, context: &ResolveContext) -> Result<Self, ConfigError> {
        // ── 1단계: 스키마 검증 ──
        let validated = env::validate(raw)?;

        // ── 2단계: 기본값 계산과 정규화 ──
        let port = defaults::resolve_port(validated.port.as_deref())?;
        if validated.port.is_none() {
            tracing::debug!(port, "PORT not set, using default");
        }

        let auth0_issuer = defaults::normalize_issuer(validated.auth0_issuer.as_str());

        let (resource_server_raw, resource_server_url) = match validated.resource_server_url {
            Some(var) => (var.as_str().to_string(), var.into_url()),
            None => {
                let value = defaults::default_resource_server_url(port);
                let url = Url::parse(&value).map_err(|source| ConfigError::DerivedUrl {
                    value: value.clone(),
                    source,
                })?;
                tracing::debug!(%url, "RESOURCE_SERVER_URL not set, using default");
                (value, url)
            }
        };

        let expected_audiences =
            defaults::derive_audiences(validated.jwt_audiences.as_deref(), &resource_server_raw);

        let trend_data_dir = defaults::resolve_trend_data_dir(
            validated.trend_data_dir.as_deref(),
            &context.anchor,
            &context.working_dir,
        );

        if validated.required_scopes.is_some() {
            tracing::warn!("REQUIRED_SCOPES is set but ignored; no scopes are enforced");
        }

        // ── 3단계: 허용 클라이언트 파싱 ──
        let allowed_oauth_clients =
            AllowedClientRegistry::parse(validated.oauth_allowed_clients.as_deref())?;

        // ── 4단계: 최종 조립 ──
        Ok(Self {
            port,
            auth0_issuer,
            resource_server_url,
            openai_api_key: validated.openai_api_key,
            vector_store_id: validated.vector_store_id,
            trend_data_dir,
            required_scopes: Vec::new(),
            expected_audiences,
            allowed_oauth_clients,
            service_documentation_url: validated.service_documentation_url.map(env::UrlVar::into_url),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// 항상 `/` 하나로 끝나는 issuer URL
    pub fn auth0_issuer(&self) -> &str {
        &self.auth0_issuer
    }

    pub fn resource_server_url(&self) -> &Url {
        &self.resource_server_url
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref()
    }

    pub fn vector_store_id(&self) -> Option<&str> {
        self.vector_store_id.as_deref()
    }

    /// 절대 경로 (존재 여부는 확인하지 않음)
    pub fn trend_data_dir(&self) -> &Path {
        &self.trend_data_dir
    }

    /// 현재는 항상 비어 있습니다.
    pub fn required_scopes(&self) -> &[String] {
        &self.required_scopes
    }

    /// 토큰의 `aud`로 허용되는 값들 (항상 1개 이상)
    pub fn expected_audiences(&self) -> &[String] {
        &self.expected_audiences
    }

    pub fn allowed_oauth_clients(&self) -> &AllowedClientRegistry {
        &self.allowed_oauth_clients
    }

    pub fn service_documentation_url(&self) -> Option<&Url> {
        self.service_documentation_url.as_ref()
    }
}

// API 키가 로그에 찍히지 않도록 Debug를 직접 구현합니다.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("auth0_issuer", &self.auth0_issuer)
            .field("resource_server_url", &self.resource_server_url.as_str())
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("vector_store_id", &self.vector_store_id)
            .field("trend_data_dir", &self.trend_data_dir)
            .field("required_scopes", &self.required_scopes)
            .field("expected_audiences", &self.expected_audiences)
            .field(
                "allowed_oauth_clients",
                &self.allowed_oauth_clients.client_ids().collect::<Vec<_>>(),
            )
            .field(
                "service_documentation_url",
                &self.service_documentation_url.as_ref().map(Url::as_str),
            )
            .finish()
    }
}
