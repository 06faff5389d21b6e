//! Multi-location pickup availability scanner.
//!
//! Data flow: seeds -> [`template::rewrite`] -> [`Transport::submit`] ->
//! [`normalize::normalize`] -> [`Aggregate`] -> [`report::emit`].

pub mod aggregate;
pub mod error;
pub mod normalize;
pub(crate) mod rate_limit;
pub mod report;
pub mod scan;
pub mod template;
pub mod transport;
mod value;

pub use aggregate::{Aggregate, AggregateRecord};
pub use error::{MalformedResponseError, SeedError, TransportError};
pub use normalize::{normalize, Normalized};
pub use report::{emit, Report};
pub use scan::{ScanOptions, ScanOutcome, Scanner, SeedFailure, SeedResult};
pub use template::{count_location_fields, rewrite};
pub use transport::{HttpTransport, HttpTransportConfig, Transport};
