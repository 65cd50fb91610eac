//! AcoustID fingerprint-resolution client.
//!
//! # Architecture
//!
//! - **Domain types** (`domain.rs`) - query/outcome sum types and the error
//!   taxonomy
//! - **Transport** (`transport.rs`) - the injected GET capability; reqwest
//!   in production, scripted fakes in tests
//! - **Client** (`client.rs`) - request construction and the
//!   error-normalization funnel all three lookup operations share
//!
//! # Usage
//!
//! ```ignore
//! use mp3manager::acoustid::{AcoustIdClient, LookupOutcome};
//!
//! let client = AcoustIdClient::new(api_key)?;
//! match client.lookup_by_fingerprint(fp, duration).await? {
//!     LookupOutcome::Success(metadata) => println!("{metadata}"),
//!     LookupOutcome::ServiceError(err) => eprintln!("{}", err.http_status),
//! }
//! ```
//!
//! Do not make more than 3 requests per second; no commercial usage.
//! Pacing is the caller's responsibility, not the client's.

pub mod client;
pub mod domain;
pub mod transport;

pub use client::AcoustIdClient;
pub use domain::{LookupError, LookupOutcome, LookupQuery, RemoteServiceError};
pub use transport::{HttpTransport, LookupTransport, TransportError};
