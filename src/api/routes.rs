//! Route handlers for the employee API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::debug;

use super::{AppState, EmployeeResponse, HealthResponse};
use crate::backend::{EmployeeRecord, NewEmployee};
use crate::service::ServiceResult;

/// How many names the top earners endpoint returns.
pub const TOP_EARNERS_COUNT: usize = 10;

/// Routes mounted under [`EMPLOYEE_BASE_PATH`](super::EMPLOYEE_BASE_PATH).
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(all_employees).post(create_employee))
        .route("/search/{search}", get(search_by_name))
        .route("/highestSalary", get(highest_salary))
        .route(
            "/topTenHighestEarningEmployeeNames",
            get(top_ten_highest_earning_names),
        )
        .route("/{id}", get(employee_by_id).delete(delete_employee_by_id))
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "employee-gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn to_responses(records: Vec<EmployeeRecord>) -> Vec<EmployeeResponse> {
    records.into_iter().map(EmployeeResponse::from).collect()
}

/// GET /
pub async fn all_employees(
    State(state): State<AppState>,
) -> ServiceResult<Json<Vec<EmployeeResponse>>> {
    debug!("Received request for all employees");
    let employees = state.service.all_employees().await?;
    Ok(Json(to_responses(employees)))
}

/// GET /search/{search}
pub async fn search_by_name(
    State(state): State<AppState>,
    Path(search): Path<String>,
) -> ServiceResult<Json<Vec<EmployeeResponse>>> {
    debug!(search = %search, "Received request for employee name search");
    let employees = state.service.search_by_name(&search).await?;
    Ok(Json(to_responses(employees)))
}

/// GET /{id}
pub async fn employee_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<EmployeeResponse>> {
    debug!(id = %id, "Received request for employee by id");
    let employee = state.service.employee_by_id(&id).await?;
    Ok(Json(employee.into()))
}

/// GET /highestSalary
pub async fn highest_salary(State(state): State<AppState>) -> ServiceResult<Json<u32>> {
    debug!("Received request for highest salary");
    Ok(Json(state.service.highest_salary().await?))
}

/// GET /topTenHighestEarningEmployeeNames
pub async fn top_ten_highest_earning_names(
    State(state): State<AppState>,
) -> ServiceResult<Json<Vec<String>>> {
    debug!("Received request for top earning employee names");
    Ok(Json(
        state.service.top_earning_names(TOP_EARNERS_COUNT).await?,
    ))
}

/// POST /
///
/// Malformed JSON is answered with 400 rather than axum's default 422.
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ServiceResult<Json<EmployeeResponse>> {
    let Json(input) = payload?;
    debug!(name = %input.name, "Received request to create employee");
    let created = state.service.create_employee(input).await?;
    Ok(Json(created.into()))
}

/// DELETE /{id}
///
/// Answers with the name of the deleted employee.
pub async fn delete_employee_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<String> {
    debug!(id = %id, "Received request to delete employee");
    state.service.delete_employee_by_id(&id).await
}
