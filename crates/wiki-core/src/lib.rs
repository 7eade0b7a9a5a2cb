//! # Wiki Core
//!
//! Core library for `wiki`, a command-line client for a public knowledge-base
//! API family (entity REST surface, SPARQL endpoint, legacy Action API search).
//!
//! This crate owns everything with real engineering weight and nothing that
//! talks to a terminal.
//!
//! ## Architecture
//!
//! - **vault**: passphrase-based encryption of a single bearer token
//! - **store**: atomic, owner-only persistence of the vault record
//! - **error**: closed error taxonomy with retry and exit semantics
//! - **classify**: transport failures and HTTP statuses to errors
//! - **request**: request descriptors, header masking, response payloads
//! - **adapters**: per-endpoint request builders
//! - **engine**: timeout, retry and backoff around a pluggable transport
//! - **log**: logger seam the engine reports to

pub mod adapters;
pub mod classify;
pub mod engine;
pub mod error;
pub mod fs;
pub mod log;
pub mod request;
pub mod store;
pub mod vault;

pub use adapters::{CallerHeaders, Endpoint};
pub use engine::{ReqwestTransport, RequestEngine, RetryPolicy, Transport};
pub use error::{ErrorKind, Result, WikiError};
pub use log::{LogLevel, Logger, TracingLogger};
pub use request::{Method, Payload, RequestDescriptor, RequestPreview, ResponseFormat};
pub use store::{CredentialStore, FileCredentialStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
