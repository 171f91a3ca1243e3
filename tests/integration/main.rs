//! Integration tests for the crawler
//!
//! These tests use wiremock to serve pages and robots files and tempfile
//! directories for the persisted frontier, and drive complete crawl runs
//! through the public API.

mod crawl_tests;
mod resume_tests;
mod support;
