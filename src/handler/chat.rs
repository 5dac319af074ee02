//! Chat endpoint
//!
//! Reads the JSON request body, extracts the message leniently and answers
//! with the classifier's reply. Anything that is not an object with a string
//! `message` field is treated as an empty message.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{HeaderMap, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::config::AppState;
use crate::http;
use crate::logger;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Response payload for `POST /chat`
#[derive(Debug, Serialize)]
pub struct ChatReply<'a> {
    pub reply: &'a str,
}

#[derive(Debug, Error)]
enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("failed to read request body: {0}")]
    Read(BoxError),
}

/// Handle `POST /chat`
pub async fn handle_chat<B>(headers: &HeaderMap, body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let max_body_size = state.config.http.max_body_size;
    if let Some(resp) = check_body_size(headers, max_body_size) {
        return resp;
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match read_body(body, limit).await {
        Ok(bytes) => bytes,
        Err(e @ BodyError::TooLarge(_)) => {
            logger::log_warning(&e.to_string());
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_warning(&format!("{e}, treating as empty message"));
            Bytes::new()
        }
    };

    let message = extract_message(&bytes);
    let classification = state.classifier.classify(&message);
    logger::log_classification(classification.rule, message.chars().count());

    http::build_json_response(
        StatusCode::OK,
        &ChatReply {
            reply: classification.reply,
        },
    )
}

/// Pull the `message` string out of a JSON body, defaulting to empty
pub fn extract_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_default()
}

async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(BodyError::TooLarge(limit)),
        Err(e) => Err(BodyError::Read(e)),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
