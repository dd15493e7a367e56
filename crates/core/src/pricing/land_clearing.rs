use rust_decimal::Decimal;

use crate::domain::estimate::LineItem;
use crate::domain::input::LandClearingInput;
use crate::pricing::format::{
    format_hours, format_quantity, format_rate, format_usd, round_dollars,
};
use crate::pricing::rates::RateTable;
use crate::pricing::{require_positive, IncompleteInput, ServiceQuote};

const DBH_REFERENCE_IN: u32 = 12;

/// Score-based pricing:
///
/// `score = acres × dbh × (dbh / 12) × density × (1 + height / height_reference)`
///
/// Diameter enters squared, so clearing cost grows faster than linearly with
/// tree size. Hours are `score / PPH` and cost is `hours × hourly_rate`.
pub fn quote(input: &LandClearingInput, rates: &RateTable) -> Result<ServiceQuote, IncompleteInput> {
    let acres = require_positive(input.acres, "Acreage", "Enter the acreage to continue")?;
    let avg_dbh = require_positive(
        input.avg_dbh,
        "Average DBH",
        "Enter the average tree diameter (inches) to continue",
    )?;
    let avg_height = require_positive(
        input.avg_height,
        "Average height",
        "Enter the average vegetation height (feet) to continue",
    )?;

    let table = &rates.land_clearing;
    let diameter_ratio = avg_dbh / Decimal::from(DBH_REFERENCE_IN);
    let height_factor =
        Decimal::ONE + avg_height.checked_div(table.height_reference_ft).unwrap_or(Decimal::ZERO);
    let score = [avg_dbh, diameter_ratio, table.density_factor, height_factor]
        .into_iter()
        .try_fold(acres, Decimal::checked_mul)
        .ok_or_else(IncompleteInput::out_of_range)?;
    let production_hours = score.checked_div(table.points_per_hour).unwrap_or(Decimal::ZERO);
    let cost = production_hours
        .checked_mul(table.hourly_rate)
        .map(round_dollars)
        .ok_or_else(IncompleteInput::out_of_range)?;

    Ok(ServiceQuote {
        components: vec![LineItem::new(
            format!(
                "Land clearing, {} ac (avg {}\" DBH, {} ft)",
                format_quantity(acres),
                format_quantity(avg_dbh),
                format_quantity(avg_height)
            ),
            cost,
        )],
        production_hours,
        methodology: format!(
            "score = {} ac × {}\" × ({}/{}) × {} density × (1 + {}/{} ft) = {}; {} ÷ {} PPH = {} h × {}/h = {}",
            format_quantity(acres),
            format_quantity(avg_dbh),
            format_quantity(avg_dbh),
            DBH_REFERENCE_IN,
            format_quantity(table.density_factor),
            format_quantity(avg_height),
            format_quantity(table.height_reference_ft),
            format_quantity(score),
            format_quantity(score),
            format_quantity(table.points_per_hour),
            format_hours(production_hours),
            format_rate(table.hourly_rate),
            format_usd(cost)
        ),
        range: None,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::quote;
    use crate::domain::input::LandClearingInput;
    use crate::pricing::rates::RateTable;

    fn input(acres: i64, dbh: i64, height: i64) -> LandClearingInput {
        LandClearingInput {
            acres: Some(Decimal::from(acres)),
            avg_dbh: Some(Decimal::from(dbh)),
            avg_height: Some(Decimal::from(height)),
        }
    }

    fn cost(acres: i64, dbh: i64, height: i64) -> Decimal {
        let quote = quote(&input(acres, dbh, height), &RateTable::default()).expect("complete input");
        quote.components[0].amount
    }

    #[test]
    fn scores_acreage_diameter_and_height() {
        let quote = quote(&input(2, 12, 40), &RateTable::default()).expect("complete input");

        // 2 × 12 × 1 × 1.5 × 1.4 = 50.4 pts, ÷ 2 = 25.2 h, × $475
        assert_eq!(quote.production_hours, Decimal::new(252, 1));
        assert_eq!(quote.components[0].amount, Decimal::from(11_970));
        assert!(quote.methodology.contains("= 50.4"));
        assert!(quote.methodology.ends_with("25.2 h × $475/h = $11,970"));
    }

    #[test]
    fn doubling_diameter_more_than_doubles_cost() {
        assert!(cost(1, 12, 30) > cost(1, 6, 30) * Decimal::TWO);
    }

    #[test]
    fn cost_grows_with_acreage_and_height() {
        assert!(cost(3, 8, 30) > cost(2, 8, 30));
        assert!(cost(2, 8, 60) > cost(2, 8, 30));
    }

    #[test]
    fn missing_height_is_incomplete() {
        let error = quote(
            &LandClearingInput {
                acres: Some(Decimal::ONE),
                avg_dbh: Some(Decimal::from(8)),
                avg_height: None,
            },
            &RateTable::default(),
        )
        .expect_err("height is required");
        assert!(error.0.contains("average vegetation height"));
    }
}
