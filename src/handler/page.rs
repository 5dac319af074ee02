// Chat page
// The widget posts {"message": ...} to /chat and renders the reply

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;

const INDEX_HTML: &str = include_str!("index.html");

/// Serve the chat page
pub fn serve_page(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(INDEX_HTML, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_contains_widget() {
        assert!(INDEX_HTML.contains("id=\"chatbox\""));
        assert!(INDEX_HTML.contains("fetch('/chat'"));
        assert!(INDEX_HTML.contains("Sorry, I couldn\\'t reach the server."));
    }

    #[test]
    fn test_serve_page() {
        let resp = serve_page(false);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()["Content-Length"],
            INDEX_HTML.len().to_string().as_str()
        );
    }
}
