//! Shared library for the Quack Language Model service.
//!
//! Holds the response selection core, the duck sound catalog, the
//! OpenAI-compatible wire types, and configuration loading. The daemon
//! (`qlmd`) and the CLI client (`qlmctl`) both build on this crate.

pub mod catalog;
pub mod config;
pub mod envelope;
pub mod selector;

pub use catalog::{Candidate, Catalog, ConfigurationError};
pub use config::QlmConfig;
pub use selector::{RareOverride, RecencyBuffer, ResponseSelector, TriggerRule};
