use crate::http::page::INDEX_HTML;
use crate::http::request::ParsedRequest;
use crate::http::response::Response;

/// What the server owes the client, plus the output change it asked for.
#[derive(Debug, Clone)]
pub struct Reply {
    pub response: Response,
    /// Level to hand to the device controller once the page is out
    pub side_effect: Option<bool>,
}

impl Reply {
    pub fn html(&self) -> &str {
        // The body is always built from INDEX_HTML
        std::str::from_utf8(&self.response.body).unwrap_or_default()
    }
}

/// Maps accepted requests to the fixed page.
///
/// Every path gets the same page; only the query flag matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Responder;

impl Responder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, request: &ParsedRequest) -> Reply {
        Reply {
            response: Response::html(INDEX_HTML),
            side_effect: request.query_flag,
        }
    }
}
