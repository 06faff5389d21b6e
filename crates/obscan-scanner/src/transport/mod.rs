//! Request submission.
//!
//! The scanner only needs "send this body, give me back parsed JSON", so the
//! collaborator is a trait. [`HttpTransport`] is the production implementation;
//! tests substitute an in-memory one.

mod http;

use std::future::Future;

use serde_json::Value;

use crate::error::TransportError;

pub use http::{HttpTransport, HttpTransportConfig};

/// Submits one rewritten request body and returns the parsed response.
pub trait Transport {
    fn submit(&self, body: &Value) -> impl Future<Output = Result<Value, TransportError>> + Send;
}
