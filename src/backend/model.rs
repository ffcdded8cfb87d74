//! Employee records and the upstream wire shapes.

use serde::{de, Deserialize, Deserializer, Serialize};

/// An employee as known to the upstream service.
///
/// On the wire the upstream prefixes every field except `id` with `employee_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    #[serde(rename = "employee_name")]
    pub name: String,
    #[serde(rename = "employee_salary")]
    pub salary: u32,
    #[serde(rename = "employee_age", deserialize_with = "positive")]
    pub age: u32,
    #[serde(rename = "employee_title")]
    pub title: String,
    #[serde(rename = "employee_email", default)]
    pub email: String,
}

/// Reject zero where the upstream promises a positive integer.
fn positive<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = u32::deserialize(deserializer)?;
    if value == 0 {
        return Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"a positive integer",
        ));
    }
    Ok(value)
}

/// A full listing, in the order the upstream returned it.
pub type EmployeeCollection = Vec<EmployeeRecord>;

/// Input for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub salary: u32,
    pub age: u32,
    pub title: String,
}

/// Every upstream response wraps its payload in this envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of the upstream delete call, which is keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteByName {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_prefixed_fields() {
        let json = r#"{
            "id": "4a3a170b-22cd-4ac2-aad1-9bb5b34a1507",
            "employee_name": "Tiger Nixon",
            "employee_salary": 320800,
            "employee_age": 61,
            "employee_title": "Vice Chair Executive Principal",
            "employee_email": "tnixon@company.com"
        }"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "4a3a170b-22cd-4ac2-aad1-9bb5b34a1507");
        assert_eq!(record.name, "Tiger Nixon");
        assert_eq!(record.salary, 320800);
        assert_eq!(record.age, 61);
        assert_eq!(record.email, "tnixon@company.com");
    }

    #[test]
    fn test_record_rejects_zero_age() {
        let json = r#"{"id":"1","employee_name":"A","employee_salary":1,"employee_age":0,"employee_title":"T"}"#;
        let err = serde_json::from_str::<EmployeeRecord>(json).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_record_without_email() {
        let json = r#"{"id":"1","employee_name":"A","employee_salary":1,"employee_age":20,"employee_title":"T"}"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.email, "");
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let json = r#"{"id":"1","employee_name":"A","employee_salary":-5,"employee_age":20,"employee_title":"T"}"#;
        assert!(serde_json::from_str::<EmployeeRecord>(json).is_err());
    }

    #[test]
    fn test_envelope_list() {
        let json = r#"{
            "data": [
                {"id":"1","employee_name":"A","employee_salary":10,"employee_age":30,"employee_title":"T","employee_email":"a@x"}
            ],
            "status": "Successfully processed request."
        }"#;
        let envelope: Envelope<EmployeeCollection> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(
            envelope.status.as_deref(),
            Some("Successfully processed request.")
        );
    }

    #[test]
    fn test_envelope_delete_flag() {
        let envelope: Envelope<bool> =
            serde_json::from_str(r#"{"data": true, "status": "ok"}"#).unwrap();
        assert!(envelope.data);
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_new_employee_serializes_plain_fields() {
        let input = NewEmployee {
            name: "Jane".to_string(),
            salary: 1000,
            age: 30,
            title: "Engineer".to_string(),
        };
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"name\":\"Jane\""));
        assert!(json.contains("\"salary\":1000"));
        assert!(json.contains("\"title\":\"Engineer\""));
    }
}
