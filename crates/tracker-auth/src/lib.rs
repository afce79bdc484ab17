//! Tracker Auth - Bearer session handling for tracker connectors
//!
//! This crate provides the pieces every authenticated call goes through:
//!
//! - **Token Inspection**: decode and validate bearer token claims offline
//! - **Session Storage**: the host-owned key/value store holding the raw token
//!   and the viewer state derived from it
//! - **Clock**: an injectable source of epoch time for expiry checks
//! - **Implicit Grant**: the authorize URL a host opens to obtain a token
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tracker_auth::{Clock, MemorySessionStore, Session, SystemClock, TokenInspector};
//!
//! let store = MemorySessionStore::new();
//! let token = Session::read_token(&store)?;
//! let claims = TokenInspector::validate(token.as_str())?;
//!
//! if TokenInspector::is_expired(&claims, SystemClock.now()) {
//!     Session::clear(&store);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod clock;
mod error;
mod implicit;
mod session;
mod token;

pub use clock::*;
pub use error::*;
pub use implicit::*;
pub use session::*;
pub use token::*;

/// Store key holding the raw bearer token.
pub const SESSION_KEY: &str = "session";

/// Store keys holding viewer state derived from the session.
///
/// These are cleared together with [`SESSION_KEY`] whenever the session ends.
pub const VIEWER_KEYS: [&str; 6] = [
    "viewer-id",
    "viewer-advanced-scoring",
    "viewer-list-order",
    "viewer-custom-lists",
    "viewer-split-completed-list-by-format",
    "viewer-advanced-scoring-enabled",
];
