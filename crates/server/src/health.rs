use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use landquote_core::EstimateCalculator;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    calculator: Arc<EstimateCalculator>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub rates: HealthCheck,
    pub checked_at: String,
}

pub fn router(calculator: Arc<EstimateCalculator>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { calculator })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let rates = rates_check(&state.calculator);
    let ready = rates.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "landquote-server runtime initialized".to_string(),
        },
        rates,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn rates_check(calculator: &EstimateCalculator) -> HealthCheck {
    match calculator.rates().validate() {
        Ok(()) => HealthCheck { status: "ready", detail: "rate table loaded".to_string() },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    }
}
