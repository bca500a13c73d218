use serde::Serialize;

use crate::config::Config;

/// `GET /.well-known/oauth-protected-resource` 응답 본문
///
/// MCP 클라이언트는 이 문서를 읽고 어느 인가 서버(Auth0 tenant)에서
/// 토큰을 받아야 하는지 알아냅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedResourceMetadata {
    pub resource: String,
    pub authorization_servers: Vec<String>,
    pub scopes_supported: Vec<String>,
    pub bearer_methods_supported: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_documentation: Option<String>,
}

impl From<&Config> for ProtectedResourceMetadata {
    fn from(config: &Config) -> Self {
        Self {
            resource: config.resource_server_url().to_string(),
            authorization_servers: vec![config.auth0_issuer().to_string()],
            scopes_supported: config.required_scopes().to_vec(),
            bearer_methods_supported: vec!["header".to_string()],
            resource_documentation: config.service_documentation_url().map(ToString::to_string),
        }
    }
}
