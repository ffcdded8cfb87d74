//! In-process stand-in for the upstream employee service.
//!
//! Serves the same routes and envelope as the real service, counts every
//! request it receives, and can be told to answer a window of requests with
//! a fixed failure status.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use employee_gateway::backend::{DeleteByName, EmployeeRecord, NewEmployee};
use employee_gateway::retry::RetryPolicy;
use serde_json::json;
use tokio::net::TcpListener;

const OK_STATUS: &str = "Successfully processed request.";

/// Requests numbered `from..=until` (1-based) are answered with `status`.
#[derive(Debug, Clone, Copy)]
pub struct Fault {
    pub status: StatusCode,
    pub from: usize,
    pub until: Option<usize>,
}

#[derive(Debug, Default)]
struct UpstreamState {
    employees: Vec<EmployeeRecord>,
    hits: usize,
    fault: Option<Fault>,
    garbage_body: bool,
    next_id: usize,
}

/// Handle to a running mock upstream.
#[derive(Clone, Default)]
pub struct MockUpstream {
    state: Arc<Mutex<UpstreamState>>,
}

impl MockUpstream {
    pub fn with_employees(employees: Vec<EmployeeRecord>) -> Self {
        let upstream = Self::default();
        {
            let mut state = upstream.state.lock().unwrap();
            state.next_id = employees.len();
            state.employees = employees;
        }
        upstream
    }

    /// Total requests received so far.
    pub fn hits(&self) -> usize {
        self.state.lock().unwrap().hits
    }

    pub fn reset_hits(&self) {
        self.state.lock().unwrap().hits = 0;
    }

    pub fn employee_count(&self) -> usize {
        self.state.lock().unwrap().employees.len()
    }

    /// Fail every request from now on with `status`.
    pub fn fail_all(&self, status: StatusCode) {
        let mut state = self.state.lock().unwrap();
        state.fault = Some(Fault {
            status,
            from: state.hits + 1,
            until: None,
        });
    }

    /// Fail the next `count` requests with `status`, then recover.
    pub fn fail_next(&self, count: usize, status: StatusCode) {
        let mut state = self.state.lock().unwrap();
        state.fault = Some(Fault {
            status,
            from: state.hits + 1,
            until: Some(state.hits + count),
        });
    }

    /// Start failing with 429 once `count` more requests have been served.
    pub fn rate_limit_after(&self, count: usize) {
        let mut state = self.state.lock().unwrap();
        state.fault = Some(Fault {
            status: StatusCode::TOO_MANY_REQUESTS,
            from: state.hits + count + 1,
            until: None,
        });
    }

    pub fn heal(&self) {
        self.state.lock().unwrap().fault = None;
    }

    /// Answer successful requests with a body that is not JSON.
    pub fn send_garbage(&self, enabled: bool) {
        self.state.lock().unwrap().garbage_body = enabled;
    }

    /// Serve on an ephemeral port; returns the collection URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route(
                "/api/v1/employee",
                get(list_employees).post(create_employee).delete(delete_employee),
            )
            .route("/api/v1/employee/{id}", get(find_employee))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}/api/v1/employee")
    }

    /// Count the request and decide whether it fails.
    fn admit(&self) -> Result<bool, Response> {
        let mut state = self.state.lock().unwrap();
        state.hits += 1;
        let hit = state.hits;

        if let Some(fault) = state.fault {
            let started = hit >= fault.from;
            let ended = fault.until.is_some_and(|until| hit > until);
            if started && !ended {
                let body = Json(json!({ "status": "failed", "error": fault.status.as_str() }));
                return Err((fault.status, body).into_response());
            }
        }
        Ok(state.garbage_body)
    }
}

fn ok<T: serde::Serialize>(data: T) -> Response {
    Json(json!({ "data": data, "status": OK_STATUS })).into_response()
}

fn garbage() -> Response {
    (StatusCode::OK, "<html>definitely not json</html>").into_response()
}

async fn list_employees(State(upstream): State<MockUpstream>) -> Response {
    match upstream.admit() {
        Err(response) => response,
        Ok(true) => garbage(),
        Ok(false) => ok(upstream.state.lock().unwrap().employees.clone()),
    }
}

async fn find_employee(State(upstream): State<MockUpstream>, Path(id): Path<String>) -> Response {
    match upstream.admit() {
        Err(response) => response,
        Ok(true) => garbage(),
        Ok(false) => {
            let found = upstream
                .state
                .lock()
                .unwrap()
                .employees
                .iter()
                .find(|e| e.id == id)
                .cloned();
            match found {
                Some(employee) => ok(employee),
                None => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "data": null, "status": "Not found" })),
                )
                    .into_response(),
            }
        }
    }
}

async fn create_employee(
    State(upstream): State<MockUpstream>,
    Json(input): Json<NewEmployee>,
) -> Response {
    match upstream.admit() {
        Err(response) => response,
        Ok(true) => garbage(),
        Ok(false) => {
            let mut state = upstream.state.lock().unwrap();
            state.next_id += 1;
            let record = EmployeeRecord {
                id: format!("emp-{}", state.next_id),
                email: format!("{}@company.com", input.name.to_lowercase().replace(' ', ".")),
                name: input.name,
                salary: input.salary,
                age: input.age,
                title: input.title,
            };
            state.employees.push(record.clone());
            ok(record)
        }
    }
}

async fn delete_employee(
    State(upstream): State<MockUpstream>,
    Json(input): Json<DeleteByName>,
) -> Response {
    match upstream.admit() {
        Err(response) => response,
        Ok(true) => garbage(),
        Ok(false) => {
            let mut state = upstream.state.lock().unwrap();
            let position = state.employees.iter().position(|e| e.name == input.name);
            let deleted = match position {
                Some(index) => {
                    state.employees.remove(index);
                    true
                }
                None => false,
            };
            ok(deleted)
        }
    }
}

pub fn employee(id: &str, name: &str, salary: u32) -> EmployeeRecord {
    EmployeeRecord {
        id: id.to_string(),
        name: name.to_string(),
        salary,
        age: 35,
        title: "Engineer".to_string(),
        email: format!("{id}@company.com"),
    }
}

pub fn three_employees() -> Vec<EmployeeRecord> {
    vec![
        employee("emp-1", "Tiger Nixon", 320_800),
        employee("emp-2", "Garrett Winters", 170_750),
        employee("emp-3", "Ashton Cox", 86_000),
    ]
}

pub fn new_employee(name: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        salary: 95_000,
        age: 29,
        title: "Analyst".to_string(),
    }
}

/// Short delays so retry tests stay fast.
pub fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(Duration::from_millis(1), Duration::from_millis(5), max_retries)
}
