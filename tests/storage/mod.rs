//! Shared storage integration tests.
//!
//! Tests the NewsStore interface against every SQL backend.
//! Each backend's test file seeds its database and runs these.

pub mod news_store_tests;
