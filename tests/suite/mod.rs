//! Integration test suites, grouped by feature.

mod auth_flow;
mod config;
mod list_sync;
mod mutations;
mod storage;
