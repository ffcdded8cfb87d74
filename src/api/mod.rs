//! Public HTTP API
//!
//! Exposes the employee facade under `/api/v1/employee`, plus a `/health`
//! endpoint. Upstream failures are answered with the status code of their kind.

pub mod error;
pub mod routes;

use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::backend::EmployeeRecord;
use crate::service::EmployeeService;

pub use error::{status_for, ErrorResponse};

/// Path the employee routes are mounted under.
pub const EMPLOYEE_BASE_PATH: &str = "/api/v1/employee";

/// Shared application state for the API server
#[derive(Clone)]
pub struct AppState {
    pub service: EmployeeService,
}

impl AppState {
    pub fn new(service: EmployeeService) -> Self {
        Self { service }
    }
}

/// An employee as returned by the public API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: String,
    pub name: String,
    pub salary: u32,
    pub age: u32,
    pub title: String,
    pub email: String,
}

impl From<EmployeeRecord> for EmployeeResponse {
    fn from(record: EmployeeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            salary: record.salary,
            age: record.age,
            title: record.title,
            email: record.email,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_handler))
        .nest(EMPLOYEE_BASE_PATH, routes::employee_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
