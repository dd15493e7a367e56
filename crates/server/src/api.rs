//! JSON API for the estimate widget and checkout.
//!
//! - `GET  /api/v1/rates`             active rate table
//! - `GET  /api/v1/factors`           project factor catalogue
//! - `POST /api/v1/estimate`          price a pricing input
//! - `POST /api/v1/leads`             submit a lead, re-verifying its estimate
//! - `POST /api/v1/checkout/deposit`  deposit due for a drainage package

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use landquote_core::{
    deposit_for_package, ApplicationError, CatalogueFactor, DepositQuote, DrainagePackage,
    EstimateCalculator, InterfaceError, PricingResult, RateTable, FACTOR_CATALOGUE,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::leads::{submit_with_timeout, Lead, LeadContact, LeadSink};

#[derive(Clone)]
pub struct ApiState {
    pub calculator: Arc<EstimateCalculator>,
    pub leads: Arc<dyn LeadSink>,
    pub lead_sink_timeout: Duration,
    pub deposit_pct: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub contact: LeadContact,
    pub input: Value,
    #[serde(default)]
    pub client_total: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAccepted {
    pub lead_id: Uuid,
    pub received_at: String,
    pub verified: bool,
    pub forwarded: bool,
    pub estimate: PricingResult,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub package: DrainagePackage,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub correlation_id: String,
}

/// Interface error rendered as a JSON body with a user-safe message.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    fn new(error: impl Into<ApplicationError>, correlation_id: &str) -> Self {
        Self(error.into().into_interface(correlation_id))
    }

    fn bad_request(message: impl Into<String>, correlation_id: &str) -> Self {
        Self(InterfaceError::BadRequest {
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, Some(message.clone()))
            }
            InterfaceError::ServiceUnavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, None),
            InterfaceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };
        let body = ApiErrorBody {
            error: self.0.user_message().to_string(),
            detail,
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/rates", get(rates))
        .route("/api/v1/factors", get(factors))
        .route("/api/v1/estimate", post(estimate))
        .route("/api/v1/leads", post(submit_lead))
        .route("/api/v1/checkout/deposit", post(checkout_deposit))
        .with_state(state)
}

fn correlation_id() -> String {
    format!("req-{}", Uuid::new_v4())
}

pub async fn rates(State(state): State<ApiState>) -> Json<RateTable> {
    Json(state.calculator.rates().clone())
}

pub async fn factors() -> Json<Vec<CatalogueFactor>> {
    Json(FACTOR_CATALOGUE.to_vec())
}

pub async fn estimate(
    State(state): State<ApiState>,
    Json(payload): Json<Value>,
) -> Result<Json<PricingResult>, ApiError> {
    let correlation_id = correlation_id();
    let result = state.calculator.calculate_json(&payload).map_err(|error| {
        warn!(
            event_name = "estimate.rejected",
            correlation_id = %correlation_id,
            error = %error,
            "estimate request rejected"
        );
        ApiError::new(error, &correlation_id)
    })?;

    info!(
        event_name = "estimate.computed",
        correlation_id = %correlation_id,
        service = result.service.as_str(),
        status = ?result.status,
        total = %result.total,
        minimum_applied = result.minimum_applied,
        "estimate computed"
    );
    Ok(Json(result))
}

pub async fn submit_lead(
    State(state): State<ApiState>,
    Json(request): Json<LeadRequest>,
) -> Result<(StatusCode, Json<LeadAccepted>), ApiError> {
    let correlation_id = correlation_id();
    request
        .contact
        .validate()
        .map_err(|message| ApiError::bad_request(message, &correlation_id))?;

    // The client's total is never trusted; the quote is always recomputed.
    let estimate = state
        .calculator
        .calculate_json(&request.input)
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    let lead = Lead::new(request.contact, estimate, request.client_total);

    info!(
        event_name = "lead.received",
        correlation_id = %lead.id,
        service = lead.estimate.service.as_str(),
        total = %lead.estimate.total,
        verified = lead.verified,
        "lead received"
    );
    if let Some(client_total) = lead.client_total.filter(|_| !lead.verified) {
        warn!(
            event_name = "lead.total_mismatch",
            correlation_id = %lead.id,
            client_total = %client_total,
            server_total = %lead.estimate.total,
            "client total differs from recomputed total"
        );
    }

    let submitted = submit_with_timeout(state.leads.as_ref(), &lead, state.lead_sink_timeout);
    let forwarded = match submitted.await {
        Ok(()) => true,
        Err(sink_error) => {
            let error = ApplicationError::from(sink_error);
            error!(
                event_name = "lead.sink_failed",
                correlation_id = %lead.id,
                error = %error,
                "lead sink failed; lead accepted without forwarding"
            );
            false
        }
    };

    let accepted = LeadAccepted {
        lead_id: lead.id,
        received_at: lead.received_at.to_rfc3339(),
        verified: lead.verified,
        forwarded,
        estimate: lead.estimate,
    };
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

pub async fn checkout_deposit(
    State(state): State<ApiState>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<DepositQuote>, ApiError> {
    let correlation_id = correlation_id();
    let quote = deposit_for_package(state.calculator.as_ref(), request.package, state.deposit_pct)
        .map_err(|error| {
            error!(
                event_name = "checkout.deposit_failed",
                correlation_id = %correlation_id,
                error = %error,
                "deposit could not be computed"
            );
            ApiError::new(error, &correlation_id)
        })?;

    info!(
        event_name = "checkout.deposit_quoted",
        correlation_id = %correlation_id,
        package = request.package.as_str(),
        package_price = %quote.package_price,
        deposit = %quote.deposit,
        "deposit quoted"
    );
    Ok(Json(quote))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        extract::State,
        http::{Request, StatusCode},
        Json,
    };
    use landquote_core::{DrainagePackage, EstimateCalculator, EstimateStatus};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{checkout_deposit, estimate, router, submit_lead, ApiState, DepositRequest};
    use crate::leads::testing::{FailingLeadSink, MemoryLeadSink, StalledLeadSink};
    use crate::leads::{LeadSink, LEAD_SINK_TIMEOUT};

    fn state_with(leads: Arc<dyn LeadSink>) -> ApiState {
        ApiState {
            calculator: Arc::new(EstimateCalculator::default()),
            leads,
            lead_sink_timeout: LEAD_SINK_TIMEOUT,
            deposit_pct: Decimal::from(25),
        }
    }

    fn state() -> ApiState {
        state_with(Arc::new(MemoryLeadSink::default()))
    }

    fn lead_request(client_total: Value) -> super::LeadRequest {
        serde_json::from_value(json!({
            "contact": { "name": "Dana Reyes", "phone": "555-0100" },
            "input": {
                "service": "forestry-mulching",
                "acres": 2.5,
                "dbhPackage": "6\""
            },
            "clientTotal": client_total
        }))
        .expect("valid lead request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should be readable");
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    }

    #[tokio::test]
    async fn estimate_returns_priced_result() {
        let Json(result) = estimate(
            State(state()),
            Json(json!({
                "service": "stump-grinding",
                "stumps": [{ "dbh": 24, "heightAbove": 6, "depthBelow": 12 }]
            })),
        )
        .await
        .expect("estimate should succeed");

        assert_eq!(result.status, EstimateStatus::Complete);
        assert_eq!(result.total, Decimal::from(518));
    }

    #[tokio::test]
    async fn estimate_rejects_unknown_service_with_bad_request() {
        let response = router(state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/estimate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"service":"excavation","acres":1}"#))
                    .expect("request"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["error"],
            "The request could not be processed. Check inputs and try again."
        );
        assert!(body["detail"].as_str().unwrap_or_default().contains("excavation"));
        assert!(body["correlation_id"].as_str().unwrap_or_default().starts_with("req-"));
    }

    #[tokio::test]
    async fn estimate_route_serializes_money_as_strings() {
        let response = router(state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/estimate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"service":"drainage","linearFeet":100}"#))
                    .expect("request"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], "4500");
        assert_eq!(body["low"], "3000");
        assert_eq!(body["high"], "6000");
        assert_eq!(body["service"], "drainage");
    }

    #[tokio::test]
    async fn lead_with_matching_total_is_verified_and_forwarded() {
        let sink = Arc::new(MemoryLeadSink::default());
        let (status, Json(accepted)) =
            submit_lead(State(state_with(sink.clone())), Json(lead_request(json!(7525))))
                .await
                .expect("lead should be accepted");

        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(accepted.verified);
        assert!(accepted.forwarded);
        assert_eq!(accepted.estimate.total, Decimal::from(7_525));

        let leads = sink.leads();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, accepted.lead_id);
        assert_eq!(leads[0].contact.name, "Dana Reyes");
    }

    #[tokio::test]
    async fn lead_with_tampered_total_keeps_server_quote() {
        let (_, Json(accepted)) = submit_lead(State(state()), Json(lead_request(json!("1000"))))
            .await
            .expect("lead should be accepted");

        assert!(!accepted.verified);
        assert_eq!(accepted.estimate.total, Decimal::from(7_525));
    }

    #[tokio::test]
    async fn lead_is_accepted_even_when_sink_fails() {
        let failing = state_with(Arc::new(FailingLeadSink));
        let (status, Json(accepted)) = submit_lead(State(failing), Json(lead_request(json!(7525))))
            .await
            .expect("sink failure must not reject the lead");

        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(!accepted.forwarded);
        assert!(accepted.verified);
    }

    #[tokio::test]
    async fn lead_is_accepted_when_sink_never_answers() {
        let stalled = ApiState {
            lead_sink_timeout: Duration::from_millis(50),
            ..state_with(Arc::new(StalledLeadSink))
        };
        let (status, Json(accepted)) = submit_lead(State(stalled), Json(lead_request(json!(7525))))
            .await
            .expect("a hung sink must not reject the lead");

        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(!accepted.forwarded);
        assert_eq!(accepted.estimate.total, Decimal::from(7_525));
    }

    #[tokio::test]
    async fn lead_without_contact_channel_is_rejected() {
        let request = serde_json::from_value(json!({
            "contact": { "name": "Dana Reyes" },
            "input": { "service": "drainage", "linearFeet": 80 }
        }))
        .expect("valid lead request");

        let error = submit_lead(State(state()), Json(request))
            .await
            .expect_err("contact channel is required");
        assert_eq!(
            error.0.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[tokio::test]
    async fn deposit_is_quoted_from_engine_price() {
        let Json(quote) = checkout_deposit(
            State(state()),
            Json(DepositRequest { package: DrainagePackage::Complete }),
        )
        .await
        .expect("deposit should be quoted");

        // 200 LF × $45 = $9,000
        assert_eq!(quote.package_price, Decimal::from(9_000));
        assert_eq!(quote.deposit, Decimal::from(2_250));
        assert_eq!(quote.balance_due, Decimal::from(6_750));
    }

    #[tokio::test]
    async fn catalogue_and_rates_routes_respond() {
        let app = router(state());

        let factors = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/factors").body(Body::empty()).expect("request"))
            .await
            .expect("router should respond");
        assert_eq!(factors.status(), StatusCode::OK);
        let body = json_body(factors).await;
        assert_eq!(body.as_array().map(Vec::len), Some(9));

        let rates = app
            .oneshot(Request::builder().uri("/api/v1/rates").body(Body::empty()).expect("request"))
            .await
            .expect("router should respond");
        let body = json_body(rates).await;
        assert_eq!(body["minimums"]["stump_grinding"], "300");
        assert_eq!(body["forestry"]["six_inch"], "2850");
    }
}
