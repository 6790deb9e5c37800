//! Portalx - typed client for a blockchain developer-portal backend.
//!
//! The portal exposes a REST API for browsing a contract registry,
//! submitting deployment jobs, scaffolding starter projects, proxying
//! allow-listed JSON-RPC calls, and reporting network status. This crate
//! provides the typed resource functions plus the asynchronous coordination
//! core the live pages need:
//!
//! - [`poll::Poller`]: fixed-interval polling that survives failed ticks
//!   and tears down deterministically
//! - [`query::QueryController`]: debounced search/filter queries with a
//!   sequence-number staleness guard and the page-reset rule
//! - [`job_watch::JobWatcher`]: polls a deploy job to its terminal state
//!   and fires a completion callback exactly once
//! - [`animate::AnimatedValue`]: caller-clocked cubic ease-out for
//!   displayed counters
//!
//! State flows through explicit [`state::Observed`] containers rather than
//! a reactivity runtime; each is owned by one consumer.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub mod animate;
pub mod job_watch;
pub mod poll;
pub mod query;
pub mod state;

// Re-export commonly used types
pub use config::{load, CliArgs, Config};
pub use error::{ApiError, ApiResult};
pub use http::ApiClient;
pub use types::{DeployJob, JobStatus, Page, ResourceQuery};
