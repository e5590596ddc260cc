/// HTTP request methods understood by the switch.
///
/// Only GET is accepted; any other method token is rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve the page, optionally carrying an output flag
    GET,
}

impl Method {
    /// Parses an HTTP method from its request-line token.
    ///
    /// Matching is case-sensitive, as on the wire.
    ///
    /// # Example
    ///
    /// ```
    /// # use ledswitch::http::request::Method;
    /// assert_eq!(Method::from_token(b"GET"), Some(Method::GET));
    /// assert_eq!(Method::from_token(b"get"), None);
    /// assert_eq!(Method::from_token(b"POST"), None);
    /// ```
    pub fn from_token(token: &[u8]) -> Option<Self> {
        match token {
            b"GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// A request line reduced to what the switch acts on.
///
/// Built once per connection by [`crate::http::parser::parse`] and dropped
/// after the response is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// The request method (always GET)
    pub method: Method,
    /// The request path without the query string (e.g. "/")
    pub path: String,
    /// Requested output level: `Some(true)` for `?0=ON`, `Some(false)` for
    /// `?1=OFF`, `None` when the query is absent or unrecognized
    pub query_flag: Option<bool>,
}

impl ParsedRequest {
    pub fn new(path: impl Into<String>, query_flag: Option<bool>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query_flag,
        }
    }
}
