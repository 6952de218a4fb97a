//! Query-string helpers used when replaying `next` links.

use crate::error::PaginationError;

/// Decoded query parameters, in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues(Vec<(String, String)>);

impl QueryValues {
    /// Strict parse: any malformed percent escape rejects the whole query.
    pub fn parse(query: &str) -> Result<Self, PaginationError> {
        let mut pairs = Vec::new();
        for part in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            pairs.push((unescape(key)?, unescape(value)?));
        }
        Ok(Self(pairs))
    }

    /// First value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Parses an integer parameter; absent or empty yields `None`.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>, PaginationError> {
        match self.get(key) {
            "" => Ok(None),
            v => v
                .parse()
                .map(Some)
                .map_err(|_| PaginationError::InvalidNextPage),
        }
    }
}

fn unescape(s: &str) -> Result<String, PaginationError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(PaginationError::InvalidNextPage);
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    let spaced = s.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|c| c.into_owned())
        .map_err(|_| PaginationError::InvalidNextPage)
}

/// Splits a relative `next` link into its query parameters.
pub fn parse_next_link(next: &str) -> Result<QueryValues, PaginationError> {
    if next.is_empty() {
        return Err(PaginationError::MissingNextPage);
    }
    let parts: Vec<&str> = next.split('?').collect();
    if parts.len() != 2 {
        return Err(PaginationError::InvalidNextPage);
    }
    QueryValues::parse(parts[1])
}

/// Loose boolean: anything but empty, `false`, `f` or `0` is true.
pub fn parse_bool(value: &str) -> bool {
    let v = value.to_lowercase();
    !v.is_empty() && v != "false" && v != "f" && v != "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_link() {
        let q = parse_next_link("/api/v1.0/feed/flat/1/?limit=25&id_lt=a%2Cb&kinds=x+y").unwrap();
        assert_eq!(q.get("limit"), "25");
        assert_eq!(q.get("id_lt"), "a,b");
        assert_eq!(q.get("kinds"), "x y");
        assert_eq!(q.get("missing"), "");
        assert_eq!(q.get_int("limit"), Ok(Some(25)));
        assert_eq!(q.get_int("offset"), Ok(None));
    }

    #[test]
    fn test_parse_next_link_errors() {
        assert_eq!(parse_next_link(""), Err(PaginationError::MissingNextPage));
        assert_eq!(
            parse_next_link("/no/query"),
            Err(PaginationError::InvalidNextPage)
        );
        assert_eq!(
            parse_next_link("/a?b?c"),
            Err(PaginationError::InvalidNextPage)
        );
        assert_eq!(
            parse_next_link("/api?limit=%zz"),
            Err(PaginationError::InvalidNextPage)
        );
        let q = parse_next_link("/api?limit=ten").unwrap();
        assert_eq!(q.get_int("limit"), Err(PaginationError::InvalidNextPage));
    }

    #[test]
    fn test_parse_bool() {
        for t in ["true", "T", "1", "yes"] {
            assert!(parse_bool(t));
        }
        for f in ["", "false", "F", "0"] {
            assert!(!parse_bool(f));
        }
    }
}
