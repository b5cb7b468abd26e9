//! HTTP transport layer for the Azumuta client.
//!
//! Provides the transport abstraction used by the services and a
//! reqwest-backed implementation.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};
