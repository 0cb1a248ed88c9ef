//! Request handling for the calculate endpoint
//!
//! Transport-agnostic: takes the raw body, returns a status code and JSON body.
//! The Lambda binary adds headers and maps HTTP methods.

use crate::error::ProjectionError;
use crate::projection::{ProjectionEngine, ProjectionRequest};
use serde::Serialize;

/// Message returned for every internal failure
pub const INTERNAL_FAILURE_MESSAGE: &str = "Failed to calculate investment projections";

/// Message returned for methods other than POST and OPTIONS
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// Headers attached to every response
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

/// Status code and serialized JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(body: String) -> Self {
        Self { status: 200, body }
    }

    /// `{"message": ...}` body with the given status
    pub fn message(status: u16, message: &str) -> Self {
        let body = serde_json::to_string(&ErrorBody { message })
            .unwrap_or_else(|_| format!(r#"{{"message":"{}"}}"#, INTERNAL_FAILURE_MESSAGE));
        Self { status, body }
    }

    pub fn internal_failure() -> Self {
        Self::message(500, INTERNAL_FAILURE_MESSAGE)
    }

    pub fn method_not_allowed() -> Self {
        Self::message(405, METHOD_NOT_ALLOWED_MESSAGE)
    }

    /// Empty body for CORS preflight
    pub fn preflight() -> Self {
        Self { status: 200, body: String::new() }
    }
}

/// Handle a calculate request body
pub fn handle_calculate(engine: &ProjectionEngine, body: &str) -> ApiResponse {
    let request: ProjectionRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            log::error!("Error calculating projections: unreadable request body: {}", e);
            return ApiResponse::internal_failure();
        }
    };

    let outcome = match engine.project(&request) {
        Ok(outcome) => outcome,
        Err(ProjectionError::InvalidInput(e)) => {
            log::debug!("Rejected request: {}", e);
            return ApiResponse::message(400, &e.to_string());
        }
        Err(e) => {
            log::error!("Error calculating projections: {}", e);
            return ApiResponse::internal_failure();
        }
    };

    for warning in &outcome.warnings {
        log::warn!("Projection warning: {:?}", warning);
    }

    match serde_json::to_string(&outcome.result) {
        Ok(json) => ApiResponse::ok(json),
        Err(e) => {
            log::error!("Error serializing projection: {}", e);
            ApiResponse::internal_failure()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn call(body: &str) -> (u16, Value) {
        let engine = ProjectionEngine::with_builtin();
        let response = handle_calculate(&engine, body);
        (response.status, serde_json::from_str(&response.body).unwrap())
    }

    #[test]
    fn test_success_shape() {
        let (status, json) = call(
            r#"{"totalInvestment":100000,"duration":12,"falconAllocation":25,
                "bsBuyAllocation":25,"maxDistanceAllocation":25,"ubsAllocation":25}"#,
        );
        assert_eq!(status, 200);
        assert_eq!(json["avgMonthlyReturn"], "3.41");
        assert_eq!(json["riskLevel"], "Moderate");
        assert_eq!(json["riskDescription"], "Balanced portfolio with moderate volatility");
        assert_eq!(json["monthlyProjections"].as_array().unwrap().len(), 13);
        assert_eq!(json["monthlyProjections"][0]["value"], 100000);
        assert_eq!(json["strategies"]["Falcon"]["investment"], 25000);
        assert_eq!(json["strategies"]["Falcon"]["allocation"], 0.25);
        assert_eq!(json["strategies"]["UBS WITH ATR"]["pairs"]["EURUSD"]["monthlyReturn"], 11);

        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "totalReturn",
                "totalProfit",
                "percentageReturn",
                "avgMonthlyReturn",
                "avgMonthlyProfit",
                "riskLevel",
                "riskDescription",
                "strategies",
                "monthlyProjections"
            ]
        );
    }

    #[test]
    fn test_validation_messages() {
        let (status, json) = call(
            r#"{"totalInvestment":99999,"duration":12,"falconAllocation":25,
                "bsBuyAllocation":25,"maxDistanceAllocation":25,"ubsAllocation":25}"#,
        );
        assert_eq!(status, 400);
        assert_eq!(json["message"], "Total investment must be at least $100,000");

        let (status, json) = call(
            r#"{"totalInvestment":100000,"duration":61,"falconAllocation":25,
                "bsBuyAllocation":25,"maxDistanceAllocation":25,"ubsAllocation":25}"#,
        );
        assert_eq!(status, 400);
        assert_eq!(json["message"], "Duration must be between 1 and 60 months");

        let (status, json) = call(
            r#"{"totalInvestment":100000,"duration":12,"falconAllocation":25,
                "bsBuyAllocation":25,"maxDistanceAllocation":25,"ubsAllocation":24}"#,
        );
        assert_eq!(status, 400);
        assert_eq!(json["message"], "Strategy allocations must sum to 100%");
    }

    #[test]
    fn test_empty_object_is_client_error() {
        let (status, json) = call("{}");
        assert_eq!(status, 400);
        assert_eq!(json["message"], "Total investment must be at least $100,000");
    }

    #[test]
    fn test_malformed_body_is_internal_failure() {
        for body in ["not json", "", "null"] {
            let (status, json) = call(body);
            assert_eq!(status, 500, "body {:?}", body);
            assert_eq!(json["message"], INTERNAL_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn test_fixed_responses() {
        assert_eq!(ApiResponse::method_not_allowed().body, r#"{"message":"Method not allowed"}"#);
        assert_eq!(ApiResponse::method_not_allowed().status, 405);
        assert_eq!(ApiResponse::preflight(), ApiResponse { status: 200, body: String::new() });
    }
}
