//! Lead intake: the customer's contact details plus the estimate the server
//! recomputed for their inputs, handed to a pluggable [`LeadSink`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landquote_core::{ApplicationError, PricingResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadContact {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LeadContact {
    /// A lead needs a name and at least one way to reach the customer.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("contact.name is required".to_string());
        }
        let reachable = [&self.email, &self.phone]
            .into_iter()
            .any(|value| value.as_deref().is_some_and(|value| !value.trim().is_empty()));
        if !reachable {
            return Err("contact.email or contact.phone is required".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub contact: LeadContact,
    pub estimate: PricingResult,
    pub client_total: Option<Decimal>,
    /// The total the customer saw matches the server's recomputation.
    pub verified: bool,
}

impl Lead {
    pub fn new(contact: LeadContact, estimate: PricingResult, client_total: Option<Decimal>) -> Self {
        let verified = estimate.is_complete() && client_total == Some(estimate.total);
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            contact,
            estimate,
            client_total,
            verified,
        }
    }
}

/// Upper bound on a single sink call before the lead is accepted unforwarded.
pub const LEAD_SINK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum LeadSinkError {
    #[error("lead sink unavailable: {0}")]
    Unavailable(String),
    #[error("lead sink did not respond within {0:?}")]
    TimedOut(Duration),
}

/// Submits with a deadline; an elapsed deadline is reported as a sink error.
pub async fn submit_with_timeout(
    sink: &dyn LeadSink,
    lead: &Lead,
    limit: Duration,
) -> Result<(), LeadSinkError> {
    tokio::time::timeout(limit, sink.submit(lead))
        .await
        .unwrap_or(Err(LeadSinkError::TimedOut(limit)))
}

impl From<LeadSinkError> for ApplicationError {
    fn from(error: LeadSinkError) -> Self {
        Self::LeadSink(error.to_string())
    }
}

#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn submit(&self, lead: &Lead) -> Result<(), LeadSinkError>;
}

/// Records leads in the structured log. Default sink when no CRM or mailer
/// is wired in.
#[derive(Clone, Debug, Default)]
pub struct TracingLeadSink;

#[async_trait]
impl LeadSink for TracingLeadSink {
    async fn submit(&self, lead: &Lead) -> Result<(), LeadSinkError> {
        info!(
            event_name = "lead.forwarded",
            correlation_id = %lead.id,
            service = lead.estimate.service.as_str(),
            total = %lead.estimate.total,
            verified = lead.verified,
            contact_name = %lead.contact.name,
            "lead recorded"
        );
        Ok(())
    }
}
