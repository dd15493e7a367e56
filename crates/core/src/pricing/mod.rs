//! The estimation engine.
//!
//! Each service has one formula module that turns its measurements into
//! priced components. [`engine::EstimateCalculator`] dispatches to them and
//! applies the steps every service shares: project-factor markup, transport,
//! rounding and the minimum charge.

pub mod checkout;
pub mod drainage;
pub mod engine;
pub mod factors;
pub mod forestry;
pub mod format;
pub mod land_clearing;
pub mod rates;
pub mod stump;

use rust_decimal::Decimal;

use crate::domain::estimate::LineItem;

/// Largest value accepted for any single measurement.
pub const MAX_MEASUREMENT: u32 = 1_000_000;

/// Output of a service formula, before markup, transport and minimums.
/// Component amounts are already whole dollars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceQuote {
    pub components: Vec<LineItem>,
    pub production_hours: Decimal,
    pub methodology: String,
    pub range: Option<BaseRange>,
}

/// Low/high base cost for services quoted from a rate range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseRange {
    pub low: Decimal,
    pub high: Decimal,
}

/// A required measurement is missing or unusable. Carries the guidance shown
/// to the customer instead of a price.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncompleteInput(pub String);

impl IncompleteInput {
    pub fn new(note: impl Into<String>) -> Self {
        Self(note.into())
    }

    /// The price itself cannot be represented, even though each measurement
    /// is individually in range.
    pub fn out_of_range() -> Self {
        Self::new(
            "The estimate is outside the supported range. Check the measurements and project factors",
        )
    }
}

pub(crate) fn require_positive(
    value: Option<Decimal>,
    label: &str,
    prompt: &str,
) -> Result<Decimal, IncompleteInput> {
    let value = value.ok_or_else(|| IncompleteInput::new(prompt))?;
    if value <= Decimal::ZERO {
        return Err(IncompleteInput::new(format!("{label} must be greater than zero. {prompt}")));
    }
    require_in_range(value, label)
}

pub(crate) fn require_non_negative(
    value: Option<Decimal>,
    label: &str,
    prompt: &str,
) -> Result<Decimal, IncompleteInput> {
    let value = value.ok_or_else(|| IncompleteInput::new(prompt))?;
    if value < Decimal::ZERO {
        return Err(IncompleteInput::new(format!("{label} cannot be negative. {prompt}")));
    }
    require_in_range(value, label)
}

fn require_in_range(value: Decimal, label: &str) -> Result<Decimal, IncompleteInput> {
    if value > Decimal::from(MAX_MEASUREMENT) {
        return Err(IncompleteInput::new(format!(
            "{label} is outside the supported range (at most {MAX_MEASUREMENT})"
        )));
    }
    Ok(value)
}
