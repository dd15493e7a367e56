use rust_decimal::Decimal;

use crate::domain::estimate::LineItem;
use crate::domain::input::ForestryMulchingInput;
use crate::pricing::format::{format_quantity, format_rate, format_usd, round_dollars};
use crate::pricing::rates::RateTable;
use crate::pricing::{require_positive, IncompleteInput, ServiceQuote};

/// `acres × per-acre rate of the DBH package`.
pub fn quote(
    input: &ForestryMulchingInput,
    rates: &RateTable,
) -> Result<ServiceQuote, IncompleteInput> {
    let package = input
        .dbh_package
        .ok_or_else(|| IncompleteInput::new("Select a DBH package above to continue"))?;
    let acres = require_positive(input.acres, "Acreage", "Enter the acreage to continue")?;

    let rate = rates.forestry.per_acre(package);
    let raw_cost = acres * rate;
    let work_cost = round_dollars(raw_cost);
    let production_hours =
        raw_cost.checked_div(rates.forestry.hourly_rate).unwrap_or(Decimal::ZERO);

    Ok(ServiceQuote {
        components: vec![LineItem::new(
            format!("Forestry mulching, {} ac ({} package)", format_quantity(acres), package.label()),
            work_cost,
        )],
        production_hours,
        methodology: format!(
            "{} ac × {}/ac ({}) = {}",
            format_quantity(acres),
            format_rate(rate),
            package.label(),
            format_usd(work_cost)
        ),
        range: None,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::quote;
    use crate::domain::input::{DbhPackage, ForestryMulchingInput};
    use crate::pricing::rates::RateTable;

    fn input(acres: Option<Decimal>, package: Option<DbhPackage>) -> ForestryMulchingInput {
        ForestryMulchingInput { acres, dbh_package: package }
    }

    #[test]
    fn prices_acreage_from_package_table() {
        let quote = quote(
            &input(Some(Decimal::new(25, 1)), Some(DbhPackage::SixInch)),
            &RateTable::default(),
        )
        .expect("complete input");

        assert_eq!(quote.components.len(), 1);
        assert_eq!(quote.components[0].amount, Decimal::from(7_125));
        assert_eq!(quote.production_hours, Decimal::from(15));
        assert_eq!(quote.methodology, "2.5 ac × $2,850/ac (6\" DBH) = $7,125");
        assert!(quote.range.is_none());
    }

    #[test]
    fn missing_package_asks_for_selection() {
        let error = quote(&input(Some(Decimal::ONE), None), &RateTable::default())
            .expect_err("package is required");
        assert_eq!(error.0, "Select a DBH package above to continue");
    }

    #[test]
    fn zero_acres_is_incomplete() {
        let error =
            quote(&input(Some(Decimal::ZERO), Some(DbhPackage::FourInch)), &RateTable::default())
                .expect_err("zero acres");
        assert!(error.0.contains("Acreage must be greater than zero"));
    }

    #[test]
    fn larger_package_never_costs_less() {
        let rates = RateTable::default();
        let costs: Vec<Decimal> = DbhPackage::ALL
            .into_iter()
            .map(|package| {
                quote(&input(Some(Decimal::from(3)), Some(package)), &rates)
                    .expect("complete input")
                    .components[0]
                    .amount
            })
            .collect();

        assert!(costs.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
