use landquote_core::pricing::format::format_usd;
use landquote_core::{deposit_for_package, DrainagePackage};
use rust_decimal::Decimal;

use crate::commands::{load_calculator, CommandResult};

const COMMAND: &str = "deposit";

/// Deposit due for a drainage package. `deposit_pct` falls back to
/// `[checkout].deposit_pct`.
pub fn run(package: DrainagePackage, deposit_pct: Option<Decimal>) -> CommandResult {
    let (config, calculator) = match load_calculator(COMMAND) {
        Ok(loaded) => loaded,
        Err(result) => return result,
    };

    let deposit_pct = deposit_pct.unwrap_or(config.checkout.deposit_pct);
    match deposit_for_package(&calculator, package, deposit_pct) {
        Ok(quote) => {
            let message = format!(
                "{package} package {}: deposit {} now, {} due on completion",
                format_usd(quote.package_price),
                format_usd(quote.deposit),
                format_usd(quote.balance_due)
            );
            CommandResult::success_with(COMMAND, message, quote)
        }
        Err(error) => CommandResult::invalid_input(COMMAND, error.to_string()),
    }
}
