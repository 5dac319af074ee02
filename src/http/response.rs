//! HTTP response building module
//!
//! Builders for the status codes the chatbot server emits.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

/// Build generic HTML response
pub fn build_html_response(content: &'static str, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(content.as_bytes())
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content.len())
        .header("Cache-Control", "no-cache")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build JSON response
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_500_response();
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            build_500_response()
        })
}

/// Build health check response
pub fn build_health_response(status: &'static str, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(status.as_bytes())
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-cache")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from_static(b"ok")))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
///
/// `allow` lists the methods of the requested route. Requested headers are
/// echoed back, `Content-Type` is allowed when none were asked for.
pub fn build_options_response(
    enable_cors: bool,
    allow: &'static str,
    request_headers: Option<&HeaderValue>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(204).header("Allow", allow);

    if enable_cors {
        let allow_headers = request_headers
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("Content-Type"));
        builder = builder
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", allow_headers)
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 408 Request Timeout response
pub fn build_408_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(408)
        .header("Content-Type", "text/plain")
        .header("Connection", "close")
        .body(Full::new(Bytes::from("408 Request Timeout")))
        .unwrap_or_else(|e| {
            log_build_error("408", &e);
            Response::new(Full::new(Bytes::from("408 Request Timeout")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from_static(
        br#"{"error":"Internal server error"}"#,
    )));
    *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    resp.headers_mut()
        .insert("Content-Type", HeaderValue::from_static("application/json"));
    resp
}

/// Add the headers every response carries: `Server` and, when enabled,
/// `Access-Control-Allow-Origin: *`
pub fn apply_common_headers(resp: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = resp.headers_mut();
    if let Ok(name) = HeaderValue::from_str(&http_config.server_name) {
        headers.insert(SERVER, name);
    }
    if http_config.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_config(enable_cors: bool) -> HttpConfig {
        HttpConfig {
            server_name: "netserve-chatbot".to_string(),
            enable_cors,
            max_body_size: 1024,
        }
    }

    #[test]
    fn test_html_head_has_no_body() {
        let resp = build_html_response("<p>hi</p>", true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "9");
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
    }

    #[test]
    fn test_json_response() {
        let resp = build_json_response(StatusCode::OK, &serde_json::json!({"reply": "x"}));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response("POST, OPTIONS");
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "POST, OPTIONS");
    }

    #[test]
    fn test_options_response() {
        let resp = build_options_response(true, "POST, OPTIONS", None);
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()["Allow"], "POST, OPTIONS");
        assert_eq!(resp.headers()["Access-Control-Allow-Methods"], "POST, OPTIONS");
        assert_eq!(resp.headers()["Access-Control-Allow-Headers"], "Content-Type");

        let requested = HeaderValue::from_static("content-type, x-requested-with");
        let resp = build_options_response(true, "POST, OPTIONS", Some(&requested));
        assert_eq!(
            resp.headers()["Access-Control-Allow-Headers"],
            "content-type, x-requested-with"
        );

        let resp = build_options_response(false, "POST, OPTIONS", Some(&requested));
        assert!(resp.headers().get("Access-Control-Allow-Methods").is_none());
        assert!(resp.headers().get("Access-Control-Allow-Headers").is_none());
    }

    #[test]
    fn test_408_closes_connection() {
        let resp = build_408_response();
        assert_eq!(resp.status(), 408);
        assert_eq!(resp.headers()["Connection"], "close");
    }

    #[test]
    fn test_common_headers() {
        let mut resp = build_404_response();
        apply_common_headers(&mut resp, &http_config(true));
        assert_eq!(resp.headers()[SERVER], "netserve-chatbot");
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let mut resp = build_404_response();
        apply_common_headers(&mut resp, &http_config(false));
        assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
