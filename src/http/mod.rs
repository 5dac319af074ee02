//! HTTP protocol layer module
//!
//! Response builders shared by the page, chat and health handlers.

pub mod response;

pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_408_response,
    build_413_response, build_health_response, build_html_response, build_json_response,
    build_options_response,
};
