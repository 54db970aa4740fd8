//! String and URL normalization helpers shared by the catalog and sync
//! pipelines.
//!
//! Dedup decisions hinge on these: two registry entries are "the same
//! server" only after names are squashed to bare alphanumerics and URLs
//! lose their cosmetic differences.

use chrono::{DateTime, Utc};
use url::Url;

/// Company-style suffixes dropped from normalized names.
const COMPANY_TAILS: &[&str] = &["inc", "corp", "labs", "llc", "ltd", "hq"];

/// Product-style suffixes dropped after company tails.
const PRODUCT_TAILS: &[&str] = &["ai", "app"];

/// Normalize a display or org name for comparison: lowercase, keep
/// alphanumerics only, drop common company/product tails.
pub fn norm(s: &str) -> String {
    let squashed: String = s.to_lowercase().chars().filter(|c| c.is_alphanumeric()).collect();
    let trimmed = strip_tail(&squashed, COMPANY_TAILS);
    strip_tail(trimmed, PRODUCT_TAILS).to_string()
}

fn strip_tail<'a>(s: &'a str, tails: &[&str]) -> &'a str {
    for tail in tails {
        if let Some(stripped) = s.strip_suffix(tail) {
            return stripped;
        }
    }
    s
}

/// Normalize a URL for comparison: lowercase scheme and host, drop default
/// ports and trailing slashes, discard query and fragment.
///
/// Returns None when the input does not parse as an absolute URL.
pub fn normalize_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    // Url::parse already drops ports that match the scheme default.
    let netloc = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    };

    let path = parsed.path().trim_end_matches('/');
    Some(format!("{}://{}{}", parsed.scheme(), netloc, path))
}

/// Parse a GitHub repository URL into (owner, repo), trimming a `.git`
/// suffix. Returns None for non-GitHub hosts or short paths.
pub fn parse_repo_url(raw: &str) -> Option<(String, String)> {
    let parsed = Url::parse(raw).ok()?;
    if !parsed.host_str()?.eq_ignore_ascii_case("github.com") {
        return None;
    }

    let mut parts = parsed.path().split('/').filter(|p| !p.is_empty());
    let owner = parts.next()?.to_string();
    let repo = parts.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo).to_string();
    Some((owner, repo))
}

/// Whole days elapsed since an ISO-8601 timestamp. None means the
/// timestamp is absent or unparseable (treated as "never" by callers).
pub fn days_since(iso: Option<&str>) -> Option<i64> {
    let t = DateTime::parse_from_rfc3339(iso?).ok()?;
    Some((Utc::now() - t.with_timezone(&Utc)).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_norm_strips_punctuation_and_case() {
        assert_eq!(norm("Chrome-DevTools"), "chromedevtools");
        assert_eq!(norm("team_work 2"), "teamwork2");
    }

    #[test]
    fn test_norm_drops_company_tails() {
        assert_eq!(norm("Acme Inc"), "acme");
        assert_eq!(norm("Notion HQ"), "notion");
        assert_eq!(norm("Widget Labs"), "widget");
    }

    #[test]
    fn test_norm_drops_product_tail_after_company_tail() {
        // "ai"/"app" only falls after the company tail pass
        assert_eq!(norm("KlavisAI"), "klavis");
        assert_eq!(norm("SuperApp Inc"), "super");
    }

    #[test]
    fn test_norm_empty() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("---"), "");
    }

    #[test]
    fn test_normalize_url_basic() {
        assert_eq!(
            normalize_url("https://GitHub.com/Foo/Bar/").as_deref(),
            Some("https://github.com/Foo/Bar")
        );
    }

    #[test]
    fn test_normalize_url_default_port_dropped() {
        assert_eq!(
            normalize_url("https://example.com:443/x").as_deref(),
            Some("https://example.com/x")
        );
        assert_eq!(
            normalize_url("http://example.com:80/").as_deref(),
            Some("http://example.com")
        );
    }

    #[test]
    fn test_normalize_url_custom_port_kept() {
        assert_eq!(
            normalize_url("http://example.com:8080/x").as_deref(),
            Some("http://example.com:8080/x")
        );
    }

    #[test]
    fn test_normalize_url_drops_query_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/a?b=1#c").as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn test_normalize_url_invalid() {
        assert!(normalize_url("not a url").is_none());
    }

    #[test]
    fn test_parse_repo_url() {
        assert_eq!(
            parse_repo_url("https://github.com/obot-platform/mcp-catalog"),
            Some(("obot-platform".to_string(), "mcp-catalog".to_string()))
        );
        assert_eq!(
            parse_repo_url("https://github.com/foo/bar.git"),
            Some(("foo".to_string(), "bar".to_string()))
        );
    }

    #[test]
    fn test_parse_repo_url_rejects_other_hosts() {
        assert!(parse_repo_url("https://gitlab.com/foo/bar").is_none());
    }

    #[test]
    fn test_parse_repo_url_rejects_short_paths() {
        assert!(parse_repo_url("https://github.com/foo").is_none());
        assert!(parse_repo_url("https://github.com/").is_none());
    }

    #[test]
    fn test_days_since_absent() {
        assert!(days_since(None).is_none());
        assert!(days_since(Some("garbage")).is_none());
    }

    #[test]
    fn test_days_since_recent() {
        let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
        assert_eq!(days_since(Some(&yesterday)), Some(1));
    }

    #[test]
    fn test_days_since_z_suffix() {
        let old = (Utc::now() - Duration::days(90)).format("%Y-%m-%dT%H:%M:%SZ").to_string();
        assert_eq!(days_since(Some(&old)), Some(90));
    }
}
