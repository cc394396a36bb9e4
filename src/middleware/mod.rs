// ABOUTME: HTTP middleware for request correlation and cross-origin access
// ABOUTME: Provides request ID propagation, request spans, and CORS configuration

pub mod cors;
pub mod request_id;

// CORS configuration
pub use cors::setup_cors;

// Request correlation
pub use request_id::{create_request_span, propagate_request_id_layer, set_request_id_layer};
