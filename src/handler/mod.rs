//! Request handler module
//!
//! Serves the chat page and answers chat messages.

pub mod chat;
pub mod page;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
