//! # 기본값 계산과 정규화
//!
//! 입력에서는 선택이지만 최종 설정에서는 반드시 값이 있어야 하는 필드들을 계산합니다.
//!
//! - `PORT` → 정수 파싱 (없으면 8788)
//! - `AUTH0_ISSUER` → 끝에 `/`가 정확히 하나 붙도록 정규화
//! - `TREND_DATA_DIR` → 절대 경로로 해석 (없으면 고정 앵커 기준 기본 경로)
//! - `JWT_AUDIENCES` → 쉼표로 분리 (비면 리소스 서버 URL 하나)
//!
//! 모든 함수는 순수 함수입니다. 프로세스 환경이나 현재 디렉토리를 직접 읽지 않습니다.

use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// `PORT`가 없을 때 쓰는 기본 포트
pub const DEFAULT_PORT: u16 = 8788;

/// 기본 트렌드 데이터 디렉토리 (앵커 기준 상대 경로)
pub const DEFAULT_TREND_DATA_SUBDIR: [&str; 2] = ["synthetic_financial_data", "web_search_trends"];

/// `PORT` 값을 10진수 포트 번호로 파싱합니다.
///
/// 값이 없으면 `DEFAULT_PORT`를 씁니다. 값이 **있는데** 숫자가 아니면
/// 기본값으로 조용히 넘어가지 않고 `ConfigError::NumericParse`를 반환합니다.
pub fn resolve_port(value: Option<&str>) -> Result<u16, ConfigError> {
    match value {
        None => Ok(DEFAULT_PORT),
        // parse::<u16>(): 포트 범위(0~65535)를 벗어나거나 숫자가 아니면 Err
        // map_err: ParseIntError를 원문 값과 함께 ConfigError로 감쌉니다.
        Some(raw) => raw.trim().parse::<u16>().map_err(|source| ConfigError::NumericParse {
            value: raw.to_string(),
            source,
        }),
    }
}

/// issuer URL이 정확히 하나의 `/`로 끝나도록 맞춥니다. 멱등(idempotent)입니다.
///
/// ```
/// use trend_mcp_server::config::defaults::normalize_issuer;
///
/// assert_eq!(normalize_issuer("https://tenant.auth0.com"), "https://tenant.auth0.com/");
/// assert_eq!(normalize_issuer("https://tenant.auth0.com/"), "https://tenant.auth0.com/");
/// ```
pub fn normalize_issuer(issuer: &str) -> String {
    // trim_end_matches: 끝에 붙은 `/`를 개수와 상관없이 모두 지운 뒤 하나만 붙입니다.
    format!("{}/", issuer.trim_end_matches('/'))
}

/// 트렌드 데이터 디렉토리를 절대 경로로 해석합니다.
///
/// - 값이 있으면 `working_dir` 기준으로 해석 (이미 절대 경로면 그대로)
/// - 값이 없거나 비어 있으면 `anchor/synthetic_financial_data/web_search_trends`
///
/// 기본 경로는 `anchor`에만 의존하므로 현재 작업 디렉토리와 무관합니다.
/// 경로가 실제로 존재할 필요는 없습니다.
pub fn resolve_trend_data_dir(value: Option<&str>, anchor: &Path, working_dir: &Path) -> PathBuf {
    // filter: 빈 문자열은 None처럼 취급합니다.
    match value.filter(|v| !v.is_empty()) {
        // join: dir이 절대 경로면 working_dir를 무시하고 dir로 대체됩니다.
        Some(dir) => normalize_path(&working_dir.join(dir)),
        None => {
            // to_path_buf(): 빌린 &Path를 소유된 PathBuf로 복사
            let mut path = anchor.to_path_buf();
            path.extend(DEFAULT_TREND_DATA_SUBDIR);
            normalize_path(&path)
        }
    }
}

/// `JWT_AUDIENCES`를 쉼표로 나누고, 공백을 다듬고, 빈 항목은 버립니다.
///
/// 결과가 비어 있으면 `fallback`(리소스 서버 URL) 하나만 담아 반환하므로
/// 반환값은 절대 비어 있지 않습니다.
pub fn derive_audiences(value: Option<&str>, fallback: &str) -> Vec<String> {
    // 반복자(iterator) 체인: 나누기 → 다듬기 → 빈 항목 버리기 → String으로 수집
    // 순서는 입력 순서 그대로 유지됩니다.
    let audiences: Vec<String> = value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if audiences.is_empty() {
        vec![fallback.to_string()]
    } else {
        audiences
    }
}

/// `RESOURCE_SERVER_URL`이 없을 때의 기본값
pub fn default_resource_server_url(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// 파일 시스템을 건드리지 않고 `.`과 `..`을 정리합니다.
///
/// 심볼릭 링크는 따라가지 않습니다 (`canonicalize`와 다른 점).
/// 루트 위로 올라가는 `..`은 무시됩니다.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    // components(): 경로를 루트, `.`, `..`, 일반 이름 단위로 쪼갭니다.
    // 연속된 `/`와 끝의 `/`는 이 단계에서 이미 사라집니다.
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            // `..`: 직전이 일반 이름이면 하나 지우고, 루트면 무시, 그 외에는 그대로 남김
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::Prefix(_) | Component::RootDir) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_when_absent() {
        assert_eq!(resolve_port(None).unwrap(), 8788);
    }

    #[test]
    fn port_parses_explicit_value() {
        assert_eq!(resolve_port(Some("3000")).unwrap(), 3000);
    }

    #[test]
    fn port_rejects_garbage_instead_of_defaulting() {
        for bad in ["abc", "", "70000", "-1", "80.5"] {
            let err = resolve_port(Some(bad)).unwrap_err();
            assert!(
                matches!(&err, ConfigError::NumericParse { value, .. } if value == bad),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn issuer_gets_exactly_one_trailing_slash() {
        assert_eq!(normalize_issuer("https://a.test"), "https://a.test/");
        assert_eq!(normalize_issuer("https://a.test/"), "https://a.test/");
        assert_eq!(normalize_issuer("https://a.test//"), "https://a.test/");
        assert_eq!(normalize_issuer("https://a.test/tenant"), "https://a.test/tenant/");
    }

    #[test]
    fn issuer_normalization_is_idempotent() {
        for issuer in ["https://a.test", "https://a.test/x/", "https://a.test///"] {
            let once = normalize_issuer(issuer);
            assert_eq!(normalize_issuer(&once), once);
        }
    }

    #[test]
    fn audiences_are_trimmed_and_filtered() {
        assert_eq!(
            derive_audiences(Some(" a , b ,"), "http://localhost:8788"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn audiences_fall_back_to_resource_server() {
        assert_eq!(
            derive_audiences(None, "http://localhost:8788"),
            vec!["http://localhost:8788".to_string()]
        );
        assert_eq!(
            derive_audiences(Some(" ,  , "), "https://api.test"),
            vec!["https://api.test".to_string()]
        );
    }

    #[test]
    fn default_trend_dir_ignores_working_dir() {
        let anchor = Path::new("/srv/app");
        let first = resolve_trend_data_dir(None, anchor, Path::new("/tmp/one"));
        let second = resolve_trend_data_dir(None, anchor, Path::new("/var/two"));
        assert_eq!(first, second);
        assert_eq!(
            first,
            PathBuf::from("/srv/app/synthetic_financial_data/web_search_trends")
        );
    }

    #[test]
    fn explicit_trend_dir_resolves_against_working_dir() {
        let anchor = Path::new("/srv/app");
        assert_eq!(
            resolve_trend_data_dir(Some("data/../trends"), anchor, Path::new("/work")),
            PathBuf::from("/work/trends")
        );
        assert_eq!(
            resolve_trend_data_dir(Some("/abs/trends/"), anchor, Path::new("/work")),
            PathBuf::from("/abs/trends")
        );
    }

    #[test]
    fn empty_trend_dir_uses_default() {
        let anchor = Path::new("/srv/app");
        assert_eq!(
            resolve_trend_data_dir(Some(""), anchor, Path::new("/work")),
            resolve_trend_data_dir(None, anchor, Path::new("/work"))
        );
    }

    #[test]
    fn normalize_path_collapses_dots() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("../a/..")), PathBuf::from(".."));
    }
}
