//! # AusDB Server
//!
//! HTTP service over two fixed medical audio datasets (heart and breath
//! sounds): load once at startup, then answer exact record fetches, filtered
//! random selection, and static file requests over the read-only collections.

pub mod api;
pub mod breath;
pub mod error;
pub mod heart;

pub use error::{ApiError, ApiResult};
