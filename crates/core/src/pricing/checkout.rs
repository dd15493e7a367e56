use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PricingError;
use crate::pricing::drainage::DrainagePackage;
use crate::pricing::engine::PricingEngine;
use crate::pricing::format::round_dollars;

pub const DEFAULT_DEPOSIT_PCT: u32 = 25;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositQuote {
    pub package: DrainagePackage,
    pub linear_feet: Decimal,
    pub package_price: Decimal,
    pub deposit_pct: Decimal,
    pub deposit: Decimal,
    pub balance_due: Decimal,
}

/// Deposit owed at checkout for a fixed drainage package. The package price
/// is whatever the engine quotes for the package footage.
pub fn deposit_for_package(
    engine: &dyn PricingEngine,
    package: DrainagePackage,
    deposit_pct: Decimal,
) -> Result<DepositQuote, PricingError> {
    if deposit_pct <= Decimal::ZERO || deposit_pct > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidDepositPercentage(deposit_pct));
    }

    let estimate = engine.price(&package.pricing_input());
    if !estimate.is_complete() {
        return Err(PricingError::InvalidRateTable(format!(
            "drainage package `{package}` could not be priced: {}",
            estimate.notes.join("; ")
        )));
    }

    let deposit = round_dollars(estimate.total * deposit_pct / Decimal::ONE_HUNDRED);
    Ok(DepositQuote {
        package,
        linear_feet: package.linear_feet(),
        package_price: estimate.total,
        deposit_pct,
        deposit,
        balance_due: estimate.total - deposit,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{deposit_for_package, DEFAULT_DEPOSIT_PCT};
    use crate::errors::PricingError;
    use crate::pricing::drainage::DrainagePackage;
    use crate::pricing::engine::EstimateCalculator;
    use crate::pricing::rates::RateTable;

    #[test]
    fn standard_package_deposit_is_a_quarter_of_engine_price() {
        let calculator = EstimateCalculator::default();
        let quote = deposit_for_package(
            &calculator,
            DrainagePackage::Standard,
            Decimal::from(DEFAULT_DEPOSIT_PCT),
        )
        .expect("valid deposit");

        // 120 LF × $45 = $5,400
        assert_eq!(quote.package_price, Decimal::from(5_400));
        assert_eq!(quote.deposit, Decimal::from(1_350));
        assert_eq!(quote.balance_due, Decimal::from(4_050));
        assert_eq!(quote.deposit + quote.balance_due, quote.package_price);
    }

    #[test]
    fn package_price_matches_a_direct_quote() {
        let calculator = EstimateCalculator::default();
        for package in DrainagePackage::ALL {
            let quote = deposit_for_package(&calculator, package, Decimal::from(30))
                .expect("valid deposit");
            assert_eq!(quote.package_price, calculator.calculate(&package.pricing_input()).total);
        }
    }

    #[test]
    fn starter_package_price_above_drainage_minimum_is_unchanged() {
        let quote = deposit_for_package(
            &EstimateCalculator::default(),
            DrainagePackage::Starter,
            Decimal::from(DEFAULT_DEPOSIT_PCT),
        )
        .expect("valid deposit");

        // 60 LF × $45 = $2,700, above the $1,750 minimum
        assert_eq!(quote.package_price, Decimal::from(2_700));
        assert_eq!(quote.deposit, Decimal::from(675));
    }

    #[test]
    fn starter_package_is_raised_to_a_binding_minimum() {
        let mut rates = RateTable::default();
        rates.minimums.drainage = Decimal::from(3_000);
        let calculator = EstimateCalculator::new(rates).expect("valid rates");

        let quote = deposit_for_package(
            &calculator,
            DrainagePackage::Starter,
            Decimal::from(DEFAULT_DEPOSIT_PCT),
        )
        .expect("valid deposit");

        // $2,700 for 60 LF is below the $3,000 minimum
        assert_eq!(quote.package_price, Decimal::from(3_000));
        assert_eq!(quote.deposit, Decimal::from(750));
        assert_eq!(quote.balance_due, Decimal::from(2_250));
    }

    #[test]
    fn rejects_deposit_outside_zero_to_hundred() {
        let calculator = EstimateCalculator::default();
        for pct in [Decimal::ZERO, Decimal::NEGATIVE_ONE, Decimal::from(101)] {
            assert_eq!(
                deposit_for_package(&calculator, DrainagePackage::Complete, pct),
                Err(PricingError::InvalidDepositPercentage(pct))
            );
        }
        assert!(
            deposit_for_package(&calculator, DrainagePackage::Complete, Decimal::ONE_HUNDRED)
                .is_ok()
        );
    }
}
