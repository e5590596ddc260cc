use crate::http::request::{Method, ParsedRequest};

/// Shortest buffer that can carry a request we accept.
const MIN_REQUEST: &[u8] = b"GET /";

const QUERY_ON: &[u8] = b"0=ON";
const QUERY_OFF: &[u8] = b"1=OFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line")]
    Malformed,
}

/// Parses the request line at the start of `buf`.
///
/// Only `GET /...` is accepted. Headers and body are never looked at; the
/// request target ends at the first space, CR, LF or at the end of the buffer.
pub fn parse(buf: &[u8]) -> Result<ParsedRequest, ParseError> {
    if buf.len() < MIN_REQUEST.len() {
        return Err(ParseError::Malformed);
    }

    let (method_token, rest) = buf.split_at(3);
    let method = Method::from_token(method_token).ok_or(ParseError::Malformed)?;

    // Exactly one space, then an origin-form target
    let target = rest.strip_prefix(b" ").ok_or(ParseError::Malformed)?;
    if target.first() != Some(&b'/') {
        return Err(ParseError::Malformed);
    }

    let end = target
        .iter()
        .position(|b| matches!(b, b' ' | b'\r' | b'\n'))
        .unwrap_or(target.len());
    let target = &target[..end];

    let (path, query) = match target.iter().position(|&b| b == b'?') {
        Some(i) => (&target[..i], Some(&target[i + 1..])),
        None => (target, None),
    };

    let path = std::str::from_utf8(path).map_err(|_| ParseError::Malformed)?;

    Ok(ParsedRequest {
        method,
        path: path.to_string(),
        query_flag: query.and_then(query_flag),
    })
}

fn query_flag(query: &[u8]) -> Option<bool> {
    if query.starts_with(QUERY_ON) {
        Some(true)
    } else if query.starts_with(QUERY_OFF) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: 192.168.4.1\r\n\r\n";

        let parsed = parse(req).unwrap();

        assert_eq!(parsed.method, Method::GET);
        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.query_flag, None);
    }

    #[test]
    fn query_flag_prefix_match() {
        assert_eq!(query_flag(b"0=ON"), Some(true));
        assert_eq!(query_flag(b"1=OFF"), Some(false));
        assert_eq!(query_flag(b"1=ON"), None);
        assert_eq!(query_flag(b""), None);
    }
}
