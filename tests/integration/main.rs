//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a mock portal and exercise the
//! login handshake and the tree crawl end-to-end.

mod common;
mod crawl_tests;
