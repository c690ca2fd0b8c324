//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the HTTP adapter decoupled from storage details.

pub mod access;
pub mod assignment_service;
pub mod catalog_service;
mod error;
pub mod query_service;

pub use error::{ServiceError, ServiceResult};

/// Trims a free-text search term; blank input means "no filter".
pub(crate) fn normalize_filter(filter: Option<&str>) -> Option<&str> {
    filter.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::normalize_filter;

    #[test]
    fn blank_filter_is_dropped() {
        assert_eq!(normalize_filter(None), None);
        assert_eq!(normalize_filter(Some("")), None);
        assert_eq!(normalize_filter(Some("   ")), None);
    }

    #[test]
    fn filter_is_trimmed() {
        assert_eq!(normalize_filter(Some("  soup ")), Some("soup"));
    }
}
