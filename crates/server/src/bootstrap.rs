use std::sync::Arc;

use axum::Router;
use landquote_core::config::{AppConfig, ConfigError, LoadOptions};
use landquote_core::{EstimateCalculator, PricingError};
use thiserror::Error;
use tracing::info;

use crate::api::{self, ApiState};
use crate::health;
use crate::leads::{LeadSink, TracingLeadSink, LEAD_SINK_TIMEOUT};

pub struct Application {
    pub config: AppConfig,
    pub calculator: Arc<EstimateCalculator>,
    pub leads: Arc<dyn LeadSink>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("rate table rejected: {0}")]
    Rates(#[from] PricingError),
}

impl Application {
    pub fn router(&self) -> Router {
        api::router(ApiState {
            calculator: self.calculator.clone(),
            leads: self.leads.clone(),
            lead_sink_timeout: LEAD_SINK_TIMEOUT,
            deposit_pct: self.config.checkout.deposit_pct,
        })
        .merge(health::router(self.calculator.clone()))
    }
}

#[cfg(test)]
pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    bootstrap_with_config(AppConfig::load(options)?)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let calculator = Arc::new(EstimateCalculator::new(config.rates.clone())?);
    info!(
        event_name = "system.bootstrap.rates_loaded",
        correlation_id = "bootstrap",
        transport_hourly_rate = %config.rates.transport.hourly_rate,
        deposit_pct = %config.checkout.deposit_pct,
        "rate table validated"
    );

    Ok(Application { config, calculator, leads: Arc::new(TracingLeadSink) })
}
