//! HTTP middleware.

mod request_log;

pub use request_log::{REQUEST_ID_HEADER, log_requests};
