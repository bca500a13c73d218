//! # 허용 OAuth 클라이언트 목록 파서
//!
//! `OAUTH_ALLOWED_CLIENTS` 환경변수의 축약 문법을 파싱하여
//! `AllowedClientRegistry`(clientId → redirect URI 목록)를 만듭니다.
//!
//! ## 문법
//! ```text
//! allowlist := entry (";" entry)*
//! entry     := clientId "|" uriList
//! uriList   := uri ("," uri)*
//! ```
//!
//! 예: `app1|https://a.test/cb,https://b.test/cb;app2|https://c.test/cb`
//!
//! - 구분자(`;`, `|`, `,`) 주변 공백은 무시합니다.
//! - 빈 항목(예: 끝에 붙은 `;`)은 조용히 건너뜁니다.
//! - 같은 clientId가 두 번 나오면 나중 항목이 앞의 항목을 덮어씁니다.

use std::collections::BTreeMap;

use crate::error::AllowListError;

/// 허용된 OAuth 클라이언트 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClientEntry {
    client_id: String,
    redirect_uris: Vec<String>,
}

impl OAuthClientEntry {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// 입력 순서대로의 redirect URI 목록 (항상 1개 이상)
    pub fn redirect_uris(&self) -> &[String] {
        &self.redirect_uris
    }

    /// redirect URI가 목록에 있는지 정확히 일치(exact match)로 확인합니다.
    pub fn allows_redirect(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|allowed| allowed == uri)
    }
}

/// clientId를 키로 하는 허용 클라이언트 레지스트리
///
/// 한 번 만들어진 뒤에는 변경되지 않습니다. 읽기 전용 메서드만 제공합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedClientRegistry {
    clients: BTreeMap<String, OAuthClientEntry>,
}

impl AllowedClientRegistry {
    /// 환경변수 값을 파싱합니다. `None`이면 빈 레지스트리입니다 (에러 아님).
    ///
    /// # 에러
    /// - `MalformedEntry`: `|`가 없거나 clientId/URI 목록이 비어 있는 항목
    /// - `MissingRedirectUris`: URI 목록이 쉼표와 공백뿐인 항목
    pub fn parse(value: Option<&str>) -> Result<Self, AllowListError> {
        let mut registry = Self::default();
        // let-else: None이면 else 블록에서 바로 반환합니다.
        let Some(value) = value else {
            return Ok(registry);
        };

        // `;`로 항목을 나누고, 끝에 붙은 `;` 등으로 생긴 빈 항목은 건너뜁니다.
        for entry in value.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            // `?`: 항목 하나라도 잘못되면 즉시 에러를 반환합니다.
            let client = parse_entry(entry)?;
            // BTreeMap::insert는 같은 키의 이전 값을 Some으로 돌려줍니다 (나중 값이 이김).
            if let Some(previous) = registry.clients.insert(client.client_id.clone(), client) {
                tracing::warn!(
                    client_id = %previous.client_id,
                    "duplicate OAUTH_ALLOWED_CLIENTS entry, later redirect URIs replace earlier ones"
                );
            }
        }

        Ok(registry)
    }

    pub fn get(&self, client_id: &str) -> Option<&OAuthClientEntry> {
        self.clients.get(client_id)
    }

    /// 해당 클라이언트가 등록되어 있고, redirect URI가 허용 목록에 있으면 true
    pub fn is_redirect_allowed(&self, client_id: &str, uri: &str) -> bool {
        self.get(client_id)
            .is_some_and(|client| client.allows_redirect(uri))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// 등록된 clientId들 (정렬된 순서)
    pub fn client_ids(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OAuthClientEntry> {
        self.clients.values()
    }
}

/// `clientId|uri,uri` 항목 하나를 파싱합니다. `entry`는 이미 trim된 상태입니다.
fn parse_entry(entry: &str) -> Result<OAuthClientEntry, AllowListError> {
    // 에러 값을 만드는 클로저. 참조만 캡처하므로 Copy이고 여러 번 쓸 수 있습니다.
    let malformed = || AllowListError::MalformedEntry {
        entry: entry.to_string(),
    };

    // split_once: 첫 번째 `|`에서만 자릅니다. 그 뒤의 `|`는 URI 목록의 일부입니다.
    // `|`가 없으면 None → ok_or_else로 Err로 바꾼 뒤 `?`로 반환합니다.
    let (client_id, uri_list) = entry.split_once('|').ok_or_else(malformed)?;
    let (client_id, uri_list) = (client_id.trim(), uri_list.trim());
    if client_id.is_empty() || uri_list.is_empty() {
        return Err(malformed());
    }

    // 쉼표로 나눈 뒤 다듬고, 빈 URI는 버립니다. 입력 순서는 유지됩니다.
    let redirect_uris: Vec<String> = uri_list
        .split(',')
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .map(str::to_string)
        .collect();
    if redirect_uris.is_empty() {
        return Err(AllowListError::MissingRedirectUris {
            client_id: client_id.to_string(),
        });
    }

    Ok(OAuthClientEntry {
        client_id: client_id.to_string(),
        redirect_uris,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_clients() {
        let registry = AllowedClientRegistry::parse(Some(
            "app1|https://a.test/cb,https://b.test/cb;app2|https://c.test/cb",
        ))
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("app1").unwrap().redirect_uris(),
            ["https://a.test/cb", "https://b.test/cb"]
        );
        assert_eq!(registry.get("app2").unwrap().redirect_uris(), ["https://c.test/cb"]);
    }

    #[test]
    fn absent_value_is_empty_registry() {
        assert!(AllowedClientRegistry::parse(None).unwrap().is_empty());
        assert!(AllowedClientRegistry::parse(Some("")).unwrap().is_empty());
        assert!(AllowedClientRegistry::parse(Some(" ; ;")).unwrap().is_empty());
    }

    #[test]
    fn whitespace_around_separators_is_ignored() {
        let registry =
            AllowedClientRegistry::parse(Some("  app1 |  https://a.test/cb , https://b.test/cb ; "))
                .unwrap();
        let client = registry.get("app1").unwrap();
        assert_eq!(client.client_id(), "app1");
        assert_eq!(client.redirect_uris(), ["https://a.test/cb", "https://b.test/cb"]);
    }

    #[test]
    fn empty_uri_list_is_rejected_with_entry_text() {
        let err = AllowedClientRegistry::parse(Some("app1|")).unwrap_err();
        assert_eq!(
            err,
            AllowListError::MalformedEntry {
                entry: "app1|".to_string()
            }
        );
        assert!(err.offending_text().contains("app1"));
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = AllowedClientRegistry::parse(Some("app1|https://a.test/cb;app2")).unwrap_err();
        assert_eq!(err.offending_text(), "app2");
    }

    #[test]
    fn empty_client_id_is_rejected() {
        let err = AllowedClientRegistry::parse(Some(" |https://a.test/cb")).unwrap_err();
        assert!(matches!(err, AllowListError::MalformedEntry { .. }));
    }

    #[test]
    fn commas_only_uri_list_names_the_client() {
        let err = AllowedClientRegistry::parse(Some("app1| , ,")).unwrap_err();
        assert_eq!(
            err,
            AllowListError::MissingRedirectUris {
                client_id: "app1".to_string()
            }
        );
    }

    #[test]
    fn duplicate_client_id_last_write_wins() {
        let registry =
            AllowedClientRegistry::parse(Some("app1|https://old.test/cb;app1|https://new.test/cb"))
                .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("app1").unwrap().redirect_uris(), ["https://new.test/cb"]);
    }

    #[test]
    fn only_first_pipe_separates_client_id() {
        let registry = AllowedClientRegistry::parse(Some("app1|https://a.test/cb|x")).unwrap();
        assert_eq!(registry.get("app1").unwrap().redirect_uris(), ["https://a.test/cb|x"]);
    }

    #[test]
    fn redirect_check_is_exact_match() {
        let registry = AllowedClientRegistry::parse(Some("app1|https://a.test/cb")).unwrap();
        assert!(registry.is_redirect_allowed("app1", "https://a.test/cb"));
        assert!(!registry.is_redirect_allowed("app1", "https://a.test/cb/"));
        assert!(!registry.is_redirect_allowed("app2", "https://a.test/cb"));
    }

    #[test]
    fn client_ids_are_sorted() {
        let registry =
            AllowedClientRegistry::parse(Some("zeta|https://z.test;alpha|https://a.test")).unwrap();
        assert_eq!(registry.client_ids().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
        assert_eq!(registry.iter().count(), 2);
    }
}
