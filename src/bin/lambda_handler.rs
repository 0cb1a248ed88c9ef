//! AWS Lambda handler for the calculate endpoint
//!
//! Accepts the projection request as a JSON POST body behind API Gateway and
//! returns the projection JSON. Set `REFERENCE_DATA_PATH` to load a reference
//! table (.json or .csv) at cold start; the built-in table is used otherwise.

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use investment_projection::api::{handle_calculate, ApiResponse, CORS_HEADERS};
use investment_projection::projection::{EngineConfig, ProjectionEngine};
use investment_projection::reference::{builtin, load_reference_path};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::path::Path;
use std::sync::Arc;

const REFERENCE_PATH_VAR: &str = "REFERENCE_DATA_PATH";

/// Dispatch on method; only POST reaches the engine
fn route(engine: &ProjectionEngine, method: &Method, body: Option<&str>) -> ApiResponse {
    if *method == Method::OPTIONS {
        ApiResponse::preflight()
    } else if *method == Method::POST {
        handle_calculate(engine, body.unwrap_or(""))
    } else {
        ApiResponse::method_not_allowed()
    }
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in CORS_HEADERS {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }
    headers
}

fn to_gateway(response: ApiResponse) -> ApiGatewayProxyResponse {
    let body = if response.body.is_empty() {
        None
    } else {
        Some(Body::Text(response.body))
    };

    ApiGatewayProxyResponse {
        status_code: i64::from(response.status),
        headers: cors_headers(),
        body,
        ..Default::default()
    }
}

/// Lambda handler function
async fn handler(
    engine: Arc<ProjectionEngine>,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let request = event.payload;

    let response = if request.is_base64_encoded {
        log::error!("Base64-encoded request bodies are not supported");
        ApiResponse::internal_failure()
    } else {
        route(&engine, &request.http_method, request.body.as_deref())
    };

    log::info!("{} -> {}", request.http_method, response.status);
    Ok(to_gateway(response))
}

fn load_engine() -> Result<ProjectionEngine, Error> {
    let reference = match std::env::var(REFERENCE_PATH_VAR) {
        Ok(path) => Arc::new(load_reference_path(Path::new(&path))?),
        Err(_) => builtin(),
    };
    Ok(ProjectionEngine::new(reference, EngineConfig::default()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let engine = Arc::new(load_engine()?);
    run(service_fn(move |event| handler(engine.clone(), event))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"totalInvestment":100000,"duration":12,"falconAllocation":25,
        "bsBuyAllocation":25,"maxDistanceAllocation":25,"ubsAllocation":25}"#;

    #[test]
    fn test_method_routing() {
        let engine = ProjectionEngine::with_builtin();
        assert_eq!(route(&engine, &Method::POST, Some(BODY)).status, 200);
        assert_eq!(route(&engine, &Method::OPTIONS, None), ApiResponse::preflight());

        let get = route(&engine, &Method::GET, None);
        assert_eq!(get.status, 405);
        assert_eq!(get.body, r#"{"message":"Method not allowed"}"#);

        assert_eq!(route(&engine, &Method::POST, None).status, 500);
    }

    #[test]
    fn test_gateway_response_headers() {
        let response = to_gateway(ApiResponse::method_not_allowed());
        assert_eq!(response.status_code, 405);
        assert_eq!(response.headers["access-control-allow-origin"], "*");
        assert_eq!(response.headers["content-type"], "application/json");
        assert_eq!(response.headers["access-control-allow-methods"], "POST, OPTIONS");

        let preflight = to_gateway(ApiResponse::preflight());
        assert!(preflight.body.is_none());
    }
}
