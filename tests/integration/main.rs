//! Integration tests; they need a running PostgreSQL (and, for the API tests,
//! a running server) and are ignored by default.
//!
//! Run with: cargo test --test integration -- --ignored

mod api_tests;
mod repository_tests;

/// Suffix that keeps natural keys unique across runs against the same database
pub fn unique_suffix() -> String {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .to_string()
}
