//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! dispatch, common headers and access logging.

use crate::config::AppState;
use crate::handler::{chat, page};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::ACCESS_CONTROL_REQUEST_HEADERS;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const PAGE_ALLOW: &str = "GET, HEAD, OPTIONS";
const CHAT_ALLOW: &str = "POST, OPTIONS";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    http::apply_common_headers(&mut response, &state.config.http);

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, state.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let is_head = method == Method::HEAD;

    let health = &state.config.health;
    let path = req.uri().path().to_string();
    match path.as_str() {
        "/" => match method {
            Method::GET | Method::HEAD => page::serve_page(is_head),
            Method::OPTIONS => preflight(&req, state, PAGE_ALLOW),
            _ => method_not_allowed(&method, PAGE_ALLOW),
        },
        "/chat" => match method {
            Method::POST => {
                let (parts, body) = req.into_parts();
                chat::handle_chat(&parts.headers, body, state).await
            }
            Method::OPTIONS => preflight(&req, state, CHAT_ALLOW),
            _ => method_not_allowed(&method, CHAT_ALLOW),
        },
        path if health.enabled && path == health.path => match method {
            Method::GET | Method::HEAD => http::build_health_response("ok", is_head),
            Method::OPTIONS => preflight(&req, state, PAGE_ALLOW),
            _ => method_not_allowed(&method, PAGE_ALLOW),
        },
        _ => http::build_404_response(),
    }
}

fn preflight<B>(req: &Request<B>, state: &AppState, allow: &'static str) -> Response<Full<Bytes>> {
    http::build_options_response(
        state.config.http.enable_cors,
        allow,
        req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS),
    )
}

fn method_not_allowed(method: &Method, allow: &'static str) -> Response<Full<Bytes>> {
    logger::log_warning(&format!("Method not allowed: {method}"));
    http::build_405_response(allow)
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
