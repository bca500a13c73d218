//! # trend-mcp-server 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 해석 (실패하면 여기서 종료)
//! 4. HTTP 서버 시작

use std::net::SocketAddr;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trend_mcp_server::{
    config::Config,
    routes::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다. 이미 설정된 변수는 덮어쓰지 않습니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 이 크레이트와 tower_http, axum을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trend_mcp_server=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 해석 ──
    // 실패하면 에러를 로그에 남기고 요청을 받기 전에 종료합니다.
    let config = Config::from_env().inspect_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
    })?;

    tracing::info!(
        port = config.port(),
        issuer = config.auth0_issuer(),
        resource = %config.resource_server_url(),
        audiences = ?config.expected_audiences(),
        "Configuration resolved"
    );
    tracing::info!(
        clients = ?config.allowed_oauth_clients().client_ids().collect::<Vec<_>>(),
        trend_data_dir = %config.trend_data_dir().display(),
        openai_api_key = config.openai_api_key().is_some(),
        vector_store = config.vector_store_id().is_some(),
        "Data access and OAuth clients"
    );
    if !config.trend_data_dir().exists() {
        tracing::warn!(
            "Trend data directory does not exist: {}",
            config.trend_data_dir().display()
        );
    }

    // ── 4단계: 서버 시작 ──
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    let app = routes::router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
