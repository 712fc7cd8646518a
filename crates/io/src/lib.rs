//! `tariffscope-io` — Structured-document tariff source.
//!
//! Reads executive-order annex tables from XLSX/XLS/ODS workbooks (via
//! calamine) or CSV, and serves them through the `TariffSource` contract.

pub mod annex;
pub mod document;
pub mod error;
pub mod reader;

pub use document::DocumentSource;
pub use error::DocumentError;
