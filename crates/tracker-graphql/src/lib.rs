//! Tracker GraphQL - Request execution for tracker connectors.
//!
//! This crate provides:
//! - Typed GraphQL operations over fixed query documents.
//! - A request executor that attaches the bearer session, hands the request to
//!   a transport scheduler, and classifies the response envelope.
//! - The auth/protocol/remote error taxonomy callers match on.
//! - Page-number cursor helpers.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod client;
mod error;
mod operation;
mod pagination;
mod transport;

pub use client::{
    GraphqlClient, GraphqlClientBuilder, GraphqlClientConfig, GraphqlClientMetrics,
    GraphqlClientMetricsSnapshot, decode_envelope,
};
pub use error::{
    GraphqlClientError, GraphqlError, GraphqlErrorLocation, ProtocolError, RemoteError,
    TransportError,
};
pub use operation::{GraphqlOperation, GraphqlQuery, GraphqlRequest, GraphqlResponse};
pub use pagination::{PageCursor, PageLimit, PagedResults, paginate_pages};
pub use transport::{HttpTransport, Transport, TransportRequest};
