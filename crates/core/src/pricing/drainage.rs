use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::estimate::LineItem;
use crate::domain::input::{DrainageInput, PricingInput};
use crate::errors::PricingError;
use crate::pricing::format::{format_quantity, format_rate, format_usd, round_dollars};
use crate::pricing::rates::RateTable;
use crate::pricing::{require_positive, BaseRange, IncompleteInput, ServiceQuote};

/// `linear feet × per-foot rate`. The total uses the midpoint of the
/// configured rate range and the range itself is reported as low/high.
pub fn quote(input: &DrainageInput, rates: &RateTable) -> Result<ServiceQuote, IncompleteInput> {
    let linear_feet =
        require_positive(input.linear_feet, "Linear footage", "Enter the linear footage to continue")?;

    let table = &rates.drainage;
    let rate = table.per_foot_quoted();
    let cost = round_dollars(linear_feet * rate);
    let range = BaseRange {
        low: round_dollars(linear_feet * table.per_foot_low),
        high: round_dollars(linear_feet * table.per_foot_high),
    };

    Ok(ServiceQuote {
        components: vec![LineItem::new(
            format!("Drainage, {} LF at {}/LF", format_quantity(linear_feet), format_rate(rate)),
            cost,
        )],
        production_hours: linear_feet.checked_div(table.feet_per_hour).unwrap_or(Decimal::ZERO),
        methodology: format!(
            "{} LF × {}/LF (range {}-{}/LF) = {}",
            format_quantity(linear_feet),
            format_rate(rate),
            format_rate(table.per_foot_low),
            format_rate(table.per_foot_high),
            format_usd(cost)
        ),
        range: Some(range),
    })
}

/// Fixed drainage tiers sold at checkout. Each is priced by running the
/// calculator on its reference footage so the package price always matches
/// the quote for the same job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainagePackage {
    Starter,
    Standard,
    Complete,
}

impl DrainagePackage {
    pub const ALL: [Self; 3] = [Self::Starter, Self::Standard, Self::Complete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Standard => "standard",
            Self::Complete => "complete",
        }
    }

    pub fn linear_feet(self) -> Decimal {
        match self {
            Self::Starter => Decimal::from(60),
            Self::Standard => Decimal::from(120),
            Self::Complete => Decimal::from(200),
        }
    }

    pub fn pricing_input(self) -> PricingInput {
        PricingInput::drainage(self.linear_feet())
    }
}

impl fmt::Display for DrainagePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrainagePackage {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|package| package.as_str() == normalized).ok_or_else(|| {
            PricingError::MalformedInput(format!(
                "unknown drainage package `{}` (expected starter|standard|complete)",
                value.trim()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{quote, DrainagePackage};
    use crate::domain::input::DrainageInput;
    use crate::pricing::rates::RateTable;
    use crate::pricing::BaseRange;

    #[test]
    fn prices_footage_at_midpoint_and_reports_range() {
        let quote = quote(
            &DrainageInput { linear_feet: Some(Decimal::from(100)) },
            &RateTable::default(),
        )
        .expect("complete input");

        assert_eq!(quote.components[0].amount, Decimal::from(4_500));
        assert_eq!(
            quote.range,
            Some(BaseRange { low: Decimal::from(3_000), high: Decimal::from(6_000) })
        );
        assert_eq!(quote.production_hours, Decimal::new(25, 1));
        assert_eq!(quote.methodology, "100 LF × $45/LF (range $30-$60/LF) = $4,500");
    }

    #[test]
    fn missing_footage_is_incomplete() {
        let error = quote(&DrainageInput::default(), &RateTable::default())
            .expect_err("footage is required");
        assert_eq!(error.0, "Enter the linear footage to continue");
    }

    #[test]
    fn packages_parse_and_grow_in_footage() {
        assert_eq!("Standard".parse::<DrainagePackage>(), Ok(DrainagePackage::Standard));
        assert!("deluxe".parse::<DrainagePackage>().is_err());
        assert!(DrainagePackage::ALL
            .windows(2)
            .all(|pair| pair[0].linear_feet() < pair[1].linear_feet()));
    }
}
