//! Employee gateway - a resilient facade over a rate-limited employee service
//!
//! The [`backend`] client retries rate-limited calls with exponential
//! backoff, keeps the last full listing in a single-slot [`cache`] to ride
//! out rate limiting on reads, and reports failures through the typed
//! [`error`] taxonomy. The [`service`] facade and the [`api`] routes sit on top.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod retry;
pub mod service;
