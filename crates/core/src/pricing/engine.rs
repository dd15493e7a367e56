use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::domain::estimate::{EstimateStatus, LineItem, PricingResult};
use crate::domain::input::{PricingInput, ServiceInput};
use crate::errors::PricingError;
use crate::pricing::factors::{select_factors, FactorSelection};
use crate::pricing::format::{format_hours, format_percent, format_rate, format_usd, round_dollars};
use crate::pricing::rates::RateTable;
use crate::pricing::{
    drainage, forestry, land_clearing, require_non_negative, stump, IncompleteInput, ServiceQuote,
};

pub trait PricingEngine: Send + Sync {
    fn price(&self, input: &PricingInput) -> PricingResult;
}

/// Owns the deploy's rate table and prices inputs against it.
///
/// Holds no other state, so one instance can serve any number of callers.
#[derive(Clone, Debug, Default)]
pub struct EstimateCalculator {
    rates: RateTable,
}

impl EstimateCalculator {
    pub fn new(rates: RateTable) -> Result<Self, PricingError> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn calculate(&self, input: &PricingInput) -> PricingResult {
        calculate_estimate(input, &self.rates)
    }

    /// Entry point for untyped payloads. Only an unknown service tag or a
    /// structurally wrong payload is an error; missing measurements produce
    /// an incomplete estimate.
    pub fn calculate_json(&self, payload: &Value) -> Result<PricingResult, PricingError> {
        let input = PricingInput::from_json(payload)?;
        Ok(self.calculate(&input))
    }
}

impl PricingEngine for EstimateCalculator {
    fn price(&self, input: &PricingInput) -> PricingResult {
        self.calculate(input)
    }
}

pub fn calculate_estimate(input: &PricingInput, rates: &RateTable) -> PricingResult {
    let service = input.service_kind();
    price_complete(input, rates)
        .unwrap_or_else(|IncompleteInput(note)| PricingResult::incomplete(service, note))
}

fn price_complete(input: &PricingInput, rates: &RateTable) -> Result<PricingResult, IncompleteInput> {
    let service = input.service_kind();
    let quote = match &input.service {
        ServiceInput::ForestryMulching(details) => forestry::quote(details, rates),
        ServiceInput::LandClearing(details) => land_clearing::quote(details, rates),
        ServiceInput::StumpGrinding(details) => stump::quote(details, rates),
        ServiceInput::Drainage(details) => drainage::quote(details, rates),
    }?;

    let transport_hours = match input.transport_hours {
        Some(hours) => require_non_negative(
            Some(hours),
            "Transport hours",
            "Check the job site location to continue",
        )?,
        None => rates.transport.default_hours(service),
    };

    let factors = select_factors(&input.project_factors);
    let ServiceQuote { components, production_hours, methodology, range } = quote;
    let subtotal = components
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.amount))
        .ok_or_else(IncompleteInput::out_of_range)?;
    let uplift = factors.uplift(subtotal).ok_or_else(IncompleteInput::out_of_range)?;
    let transport = transport_hours
        .checked_mul(rates.transport.hourly_rate)
        .map(round_dollars)
        .ok_or_else(IncompleteInput::out_of_range)?;
    let computed = checked_total(subtotal, uplift, transport)?;
    let minimum = rates.minimums.for_service(service);

    let mut line_items = components;
    let mut steps = vec![methodology];
    let mut notes = factors.notes.clone();

    if !uplift.is_zero() {
        line_items.push(LineItem::new(
            format!("Site conditions ({})", format_percent(factors.total_percentage)),
            uplift,
        ));
        steps.push(format!(
            "site conditions {} of {} = {}",
            format_percent(factors.total_percentage),
            format_usd(subtotal),
            format_usd(uplift)
        ));
    }

    if !transport.is_zero() {
        steps.push(format!(
            "transport {} h × {}/h = {}",
            format_hours(transport_hours),
            format_rate(rates.transport.hourly_rate),
            format_usd(transport)
        ));
    }

    let minimum_applied = computed < minimum;
    let total = if minimum_applied {
        line_items.push(LineItem::new(
            format!("Minimum charge adjustment ({} minimum)", format_usd(minimum)),
            minimum - computed,
        ));
        notes.push(format!(
            "{} minimum charge applies to {} jobs; the estimate of {} was raised to the minimum",
            format_usd(minimum),
            service.display_name(),
            format_usd(computed)
        ));
        steps.push(format!("raised to {} minimum", format_usd(minimum)));
        minimum
    } else {
        computed
    };
    steps.push(format!("total {}", format_usd(total)));

    let (low, high) = match range {
        Some(range) => (
            ranged_total(range.low, &factors, transport, minimum)?,
            ranged_total(range.high, &factors, transport, minimum)?,
        ),
        None => (total, total),
    };

    Ok(PricingResult {
        service,
        status: EstimateStatus::Complete,
        total,
        low,
        high,
        production_hours: production_hours
            .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
            .normalize(),
        transport,
        line_items,
        total_factor_percentage: factors.total_percentage,
        applied_factors: factors.applied,
        minimum_applied,
        methodology: steps.join("; "),
        notes,
    })
}

fn checked_total(
    subtotal: Decimal,
    uplift: Decimal,
    transport: Decimal,
) -> Result<Decimal, IncompleteInput> {
    subtotal
        .checked_add(uplift)
        .and_then(|sum| sum.checked_add(transport))
        .map(round_dollars)
        .ok_or_else(IncompleteInput::out_of_range)
}

fn ranged_total(
    base: Decimal,
    factors: &FactorSelection,
    transport: Decimal,
    minimum: Decimal,
) -> Result<Decimal, IncompleteInput> {
    let uplift = factors.uplift(base).ok_or_else(IncompleteInput::out_of_range)?;
    Ok(checked_total(base, uplift, transport)?.max(minimum))
}
