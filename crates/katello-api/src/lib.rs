#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Typed access to the Katello REST API.
//!
//! Katello identifies almost every record by a numeric id, while operators
//! think in organization, product and environment names. This crate carries:
//! - `client`: the shared HTTP client with request/response plumbing
//! - `endpoints/`: thin one-call wrappers per REST resource
//! - `tasks`: aggregation and polling of server-side asynchronous tasks
//! - `lookup`: name-to-record resolution with not-found/ambiguous reporting
//! - `models`: the typed records the server returns

pub mod client;
pub mod endpoints;
pub mod error;
pub mod lookup;
pub mod models;
pub mod tasks;

pub use client::{Credentials, DEFAULT_BASE_URL, HEADER_REQUEST_ID, KatelloClient};
pub use error::{ApiError, ApiResult, LookupError, LookupResult, ResourceKind, Scope};
pub use lookup::{DefinitionSelector, ProductSelector, SystemSelector};
pub use tasks::{AsyncTask, TaskOutcome};
