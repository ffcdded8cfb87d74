//! Upstream employee service access
//!
//! This module defines the operations the facade needs from the upstream
//! employee service and the resilient HTTP client that provides them.

pub mod client;
pub mod model;

use async_trait::async_trait;

use crate::error::UpstreamResult;

pub use client::BackendClient;
pub use model::{DeleteByName, EmployeeCollection, EmployeeRecord, Envelope, NewEmployee};

/// Operations offered by the upstream employee service.
///
/// Implementations translate every failure into an
/// [`UpstreamError`](crate::error::UpstreamError) rather than a raw transport error.
#[async_trait]
pub trait EmployeeBackend: Send + Sync {
    /// Fetch the full employee listing.
    async fn list_all(&self) -> UpstreamResult<EmployeeCollection>;

    /// Fetch one employee. `Ok(None)` means the upstream has no such id.
    async fn find_by_id(&self, id: &str) -> UpstreamResult<Option<EmployeeRecord>>;

    /// Create an employee and return the stored record.
    async fn create(&self, input: &NewEmployee) -> UpstreamResult<EmployeeRecord>;

    /// Delete the employee with the given name.
    ///
    /// Returns whether the upstream reports a deletion.
    async fn delete(&self, name: &str) -> UpstreamResult<bool>;
}
