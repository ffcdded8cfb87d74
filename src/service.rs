//! Employee facade.
//!
//! Composes backend calls into the operations the public API offers:
//! search, ranking, lookup, creation and deletion by id.

use std::cmp::Reverse;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::backend::{EmployeeBackend, EmployeeCollection, EmployeeRecord, NewEmployee};
use crate::error::UpstreamError;

/// Youngest age the upstream accepts.
pub const MIN_AGE: u32 = 16;
/// Oldest age the upstream accepts.
pub const MAX_AGE: u32 = 75;

/// Failure of a facade operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The upstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    /// The caller's input was rejected before reaching the upstream.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The requested employee does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for facade operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Public-facing employee operations over an [`EmployeeBackend`].
#[derive(Clone)]
pub struct EmployeeService {
    backend: Arc<dyn EmployeeBackend>,
}

impl EmployeeService {
    pub fn new(backend: Arc<dyn EmployeeBackend>) -> Self {
        Self { backend }
    }

    /// Every employee, in upstream order.
    pub async fn all_employees(&self) -> ServiceResult<EmployeeCollection> {
        Ok(self.backend.list_all().await?)
    }

    /// Employees whose name contains `fragment`, ignoring case.
    pub async fn search_by_name(&self, fragment: &str) -> ServiceResult<EmployeeCollection> {
        let needle = fragment.to_lowercase();
        let matches: EmployeeCollection = self
            .backend
            .list_all()
            .await?
            .into_iter()
            .filter(|employee| employee.name.to_lowercase().contains(&needle))
            .collect();

        info!(count = matches.len(), fragment, "Searched employees by name");
        Ok(matches)
    }

    /// The employee with `id`.
    pub async fn employee_by_id(&self, id: &str) -> ServiceResult<EmployeeRecord> {
        self.backend
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("employee {id}")))
    }

    /// The highest salary across all employees.
    pub async fn highest_salary(&self) -> ServiceResult<u32> {
        self.backend
            .list_all()
            .await?
            .iter()
            .map(|employee| employee.salary)
            .max()
            .ok_or_else(|| ServiceError::NotFound("no employees".to_string()))
    }

    /// Names of the `count` highest-paid employees, highest first.
    ///
    /// Ties at the cut-off are not expanded, so equally paid employees past
    /// position `count` are left out.
    pub async fn top_earning_names(&self, count: usize) -> ServiceResult<Vec<String>> {
        let mut employees = self.backend.list_all().await?;
        employees.sort_by_key(|employee| Reverse(employee.salary));
        Ok(employees
            .into_iter()
            .take(count)
            .map(|employee| employee.name)
            .collect())
    }

    /// Validate and create an employee.
    pub async fn create_employee(&self, input: NewEmployee) -> ServiceResult<EmployeeRecord> {
        validate_new_employee(&input)?;
        let created = self.backend.create(&input).await?;
        Ok(created)
    }

    /// Delete the employee with `id` and return its name.
    ///
    /// The upstream deletes by name, so if several employees share the name
    /// of the one requested, the upstream decides which of them goes.
    pub async fn delete_employee_by_id(&self, id: &str) -> ServiceResult<String> {
        info!(id, "Deleting employee");
        let employee = self.employee_by_id(id).await?;

        if self.backend.delete(&employee.name).await? {
            info!(id, name = %employee.name, "Deleted employee");
            Ok(employee.name)
        } else {
            Err(ServiceError::NotFound(format!(
                "employee {id} was not deleted"
            )))
        }
    }
}

/// Reject input the upstream would refuse.
pub fn validate_new_employee(input: &NewEmployee) -> ServiceResult<()> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name must not be blank".to_string()));
    }
    if input.title.trim().is_empty() {
        return Err(ServiceError::Validation("title must not be blank".to_string()));
    }
    if input.salary == 0 {
        return Err(ServiceError::Validation("salary must be positive".to_string()));
    }
    if !(MIN_AGE..=MAX_AGE).contains(&input.age) {
        return Err(ServiceError::Validation(format!(
            "age must be between {MIN_AGE} and {MAX_AGE}"
        )));
    }
    Ok(())
}
