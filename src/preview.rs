//! Preview override resolution from URL query strings.
//!
//! QA and stakeholders force a segment by appending a single query
//! parameter carrying an opaque preview token. The token is extracted
//! once per resolve; whether it matches anything is the assigner's
//! concern, so an unknown token here is still returned verbatim.

/// Default query parameter carrying the preview token.
pub const DEFAULT_PREVIEW_PARAM: &str = "x";

/// Extract the preview token for `param` from a raw query string.
///
/// Accepts the query with or without a leading `?`. The first occurrence
/// of the parameter wins; an empty value means no override. Tokens are
/// opaque URL-safe strings and are not percent-decoded.
///
/// # Example
///
/// ```rust
/// use cohort::preview::extract_token;
///
/// assert_eq!(extract_token("?a=1&x=4QU_6QcF_QY", "x"), Some("4QU_6QcF_QY"));
/// assert_eq!(extract_token("a=1&b=2", "x"), None);
/// ```
#[must_use]
pub fn extract_token<'a>(query: &'a str, param: &str) -> Option<&'a str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        if key == param {
            if value.is_empty() {
                return None;
            }
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_token_with_leading_question_mark() {
        assert_eq!(extract_token("?x=oOwLEFn97lM", "x"), Some("oOwLEFn97lM"));
    }

    #[test]
    fn test_extracts_token_among_other_params() {
        assert_eq!(
            extract_token("utm_source=mail&x=stEKR6ALy9g&tab=2", "x"),
            Some("stEKR6ALy9g")
        );
    }

    #[test]
    fn test_missing_param_returns_none() {
        assert_eq!(extract_token("a=1&b=2", "x"), None);
        assert_eq!(extract_token("", "x"), None);
    }

    #[test]
    fn test_empty_value_is_no_override() {
        assert_eq!(extract_token("?x=&a=1", "x"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(extract_token("x=first&x=second", "x"), Some("first"));
    }

    #[test]
    fn test_param_name_must_match_exactly() {
        assert_eq!(extract_token("xx=token", "x"), None);
        assert_eq!(extract_token("x2=token", "x"), None);
    }

    #[test]
    fn test_valueless_param_is_no_override() {
        assert_eq!(extract_token("x&a=1", "x"), None);
    }

    #[test]
    fn test_custom_param_name() {
        assert_eq!(extract_token("v=abc123", "v"), Some("abc123"));
    }
}
