//! Response envelope and operation summaries.

use serde::{Deserialize, Serialize};

/// JSON envelope returned by every operation.
///
/// Success serializes as `{"success": true, "data": ...}` and failure as
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Result of a successful seed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub message: String,
    /// Number of records written to the table.
    pub count: usize,
}

impl SeedSummary {
    pub fn new(count: usize) -> Self {
        Self {
            message: "Data seeded successfully".to_string(),
            count,
        }
    }
}

/// Result of schema initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitSummary {
    pub message: String,
    pub table: String,
    pub index: String,
    /// False when the search index already existed.
    pub index_created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::ok(SeedSummary::new(3));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "data": { "message": "Data seeded successfully", "count": 3 }
            })
        );
    }

    #[test]
    fn test_failure_envelope() {
        let response: ApiResponse<SeedSummary> = ApiResponse::failure("Seeding failed");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value, json!({ "success": false, "error": "Seeding failed" }));
    }
}
