//! Helpers for building backend endpoint URLs without doubled slashes.

/// Strip trailing slashes from a base URL.
///
/// ```
/// use cameo::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use cameo::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/api/", "/characters/alice"),
///     "http://localhost:8000/api/characters/alice"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://agents.example.com/v2"),
            "https://agents.example.com/v2"
        );
        assert_eq!(
            normalize_base_url("https://agents.example.com/v2/"),
            "https://agents.example.com/v2"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://localhost:8000", "process"),
            "http://localhost:8000/process"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000/", "/process"),
            "http://localhost:8000/process"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000/api///", "characters"),
            "http://localhost:8000/api/characters"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000", "///characters/bob"),
            "http://localhost:8000/characters/bob"
        );
    }
}
