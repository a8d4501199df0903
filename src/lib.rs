//! Test run reporter library.
//!
//! Records projects, launches, test runs, test suites and test executions
//! in a relational database and serves them over an HTTP JSON API.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
