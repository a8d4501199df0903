//! API test suite.
//!
//! Drives the full actix application against an in-memory SQLite database.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_health;
mod test_launches;
mod test_projects;
mod test_runs;
mod test_suites;
mod test_tests;
