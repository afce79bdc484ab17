//! Tracker Test Kit - Test tooling for tracker connectors
//!
//! This crate provides:
//!
//! - [`ScriptedTransport`] - A transport scheduler that replays canned responses
//!   and records every request it was handed
//! - [`MockGraphqlServer`] - A wiremock-backed GraphQL endpoint
//! - [`fixtures`] - Bearer tokens with chosen expiry and remote record payloads
//! - Tracing configuration for test output
//!
//! # Example
//!
//! ```rust,ignore
//! use tracker_testkit::{ScriptedTransport, fixtures, init_test_tracing};
//!
//! #[tokio::test]
//! async fn test_discover() {
//!     init_test_tracing();
//!
//!     let transport = ScriptedTransport::new();
//!     transport.push_data(fixtures::page_data(vec![fixtures::media(1, "Foo")], false));
//!
//!     // build the client with `.with_transport(transport.clone())`
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

pub mod fixtures;
mod mock_server;
mod scripted;
mod tracing_config;

pub use mock_server::*;
pub use scripted::*;
pub use tracing_config::*;
