//! `tariffscope-fetch` — Live government tariff API source.
//!
//! Blocking reqwest client (no Tokio runtime required). Endpoints are
//! described in configuration: a URL template, the JSON path of the entry
//! array and per-field paths. No retries, no pagination.

mod client;
mod endpoint;
mod error;
mod json_path;
mod source;

pub use client::{LiveApiClient, DEFAULT_TIMEOUT_SECS, USER_AGENT};
pub use endpoint::{EndpointConfig, FieldPaths, COUNTRY_PLACEHOLDER};
pub use error::FetchError;
pub use json_path::{json_extract, json_value_to_string};
pub use source::{LiveApiSource, LIVE_API_NAME};
