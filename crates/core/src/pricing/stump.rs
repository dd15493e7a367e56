use rust_decimal::Decimal;

use crate::domain::estimate::LineItem;
use crate::domain::input::{StumpGrindingInput, StumpInput};
use crate::pricing::format::{
    format_hours, format_quantity, format_rate, format_usd, round_dollars,
};
use crate::pricing::rates::{RateTable, StumpRates};
use crate::pricing::{require_non_negative, require_positive, IncompleteInput, ServiceQuote};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StumpMeasurement {
    pub dbh: Decimal,
    pub height_above: Decimal,
    pub depth_below: Decimal,
}

impl StumpMeasurement {
    /// `dbh² × (height above grade + grind depth below grade)`
    pub fn score(&self) -> Decimal {
        self.dbh * self.dbh * (self.height_above + self.depth_below)
    }
}

/// Prices every stump on its own and lists one line per stump. The minimum
/// charge is applied to the job by the calculator, never per stump.
pub fn quote(
    input: &StumpGrindingInput,
    rates: &RateTable,
) -> Result<ServiceQuote, IncompleteInput> {
    if input.stumps.is_empty() {
        return Err(IncompleteInput::new("Add at least one stump to continue"));
    }

    let measurements = input
        .stumps
        .iter()
        .enumerate()
        .map(|(index, stump)| measure(index + 1, stump))
        .collect::<Result<Vec<_>, _>>()?;

    let mut components = Vec::with_capacity(measurements.len());
    let mut steps = Vec::with_capacity(measurements.len());
    let mut production_hours = Decimal::ZERO;

    for (index, stump) in measurements.iter().enumerate() {
        let number = index + 1;
        let (hours, cost) = price_stump(stump, &rates.stump);
        production_hours += hours;

        components.push(LineItem::new(
            format!(
                "Stump {number}: {}\" DBH, {}\" above + {}\" below grade",
                format_quantity(stump.dbh),
                format_quantity(stump.height_above),
                format_quantity(stump.depth_below)
            ),
            cost,
        ));
        steps.push(format!(
            "Stump {number}: {}² × ({} + {}) = {} pts ÷ {} PPH = {} h × {}/h = {}",
            format_quantity(stump.dbh),
            format_quantity(stump.height_above),
            format_quantity(stump.depth_below),
            format_quantity(stump.score()),
            format_quantity(rates.stump.points_per_hour),
            format_hours(hours),
            format_rate(rates.stump.hourly_rate),
            format_usd(cost)
        ));
    }

    Ok(ServiceQuote { components, production_hours, methodology: steps.join("; "), range: None })
}

/// Hours and whole-dollar cost for one stump.
pub fn price_stump(stump: &StumpMeasurement, rates: &StumpRates) -> (Decimal, Decimal) {
    let hours = stump.score().checked_div(rates.points_per_hour).unwrap_or(Decimal::ZERO);
    (hours, round_dollars(hours * rates.hourly_rate))
}

fn measure(number: usize, stump: &StumpInput) -> Result<StumpMeasurement, IncompleteInput> {
    let dbh = require_positive(
        stump.dbh,
        &format!("Stump {number} diameter"),
        &format!("Enter the diameter of stump {number} to continue"),
    )?;
    let height_above = require_non_negative(
        stump.height_above,
        &format!("Stump {number} height above grade"),
        &format!("Enter the height above grade of stump {number} to continue"),
    )?;
    let depth_below = require_non_negative(
        stump.depth_below,
        &format!("Stump {number} grind depth"),
        &format!("Enter the grind depth below grade of stump {number} to continue"),
    )?;

    if (height_above + depth_below).is_zero() {
        return Err(IncompleteInput::new(format!(
            "Stump {number} needs a height above grade or a grind depth below grade"
        )));
    }

    Ok(StumpMeasurement { dbh, height_above, depth_below })
}
