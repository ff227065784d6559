//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use std::time::Duration;

/// Number of pages needed to cover `total` items at `page_size` per page
///
/// A page size of zero is treated as one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Format a duration as seconds with millisecond precision
pub fn format_duration(duration: Duration) -> String {
    format!("{:.3}s", duration.as_secs_f64())
}

/// Normalize a bearer credential into an `Authorization` header value
///
/// Tokens that already carry the `Bearer ` scheme are kept as-is.
pub fn bearer_header(token: &str) -> String {
    let token = token.trim();
    if token
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("bearer "))
    {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}
