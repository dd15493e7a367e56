use landquote_core::pricing::factors::catalogue_factor;
use landquote_core::{PricingInput, ProjectFactor, StumpInput};
use rust_decimal::Decimal;

use crate::commands::{load_calculator, CommandResult};

/// Options shared by every per-service quoting command.
#[derive(Clone, Debug, Default)]
pub struct QuoteOptions {
    pub factors: Vec<ProjectFactor>,
    pub transport_hours: Option<Decimal>,
}

impl QuoteOptions {
    fn apply(self, mut input: PricingInput) -> PricingInput {
        input.project_factors = self.factors;
        input.transport_hours = self.transport_hours;
        input
    }
}

pub fn run(command: &str, input: PricingInput, options: QuoteOptions) -> CommandResult {
    let (_, calculator) = match load_calculator(command) {
        Ok(loaded) => loaded,
        Err(result) => return result,
    };

    let result = calculator.calculate(&options.apply(input));
    let message = if result.is_complete() {
        result.methodology.clone()
    } else {
        result.notes.join("; ")
    };
    CommandResult::success_with(command, message, result)
}

/// `NAME` selects a catalogue factor; `NAME=PCT` supplies a custom one.
pub fn parse_factor(value: &str) -> Result<ProjectFactor, String> {
    if let Some((name, percentage)) = value.split_once('=') {
        let percentage = percentage
            .trim()
            .trim_end_matches('%')
            .parse::<Decimal>()
            .map_err(|_| format!("invalid factor percentage in `{value}`"))?;
        return Ok(ProjectFactor::new(name.trim(), percentage));
    }

    catalogue_factor(value).map(|factor| factor.to_project_factor()).ok_or_else(|| {
        format!("unknown project factor `{value}` (run `landquote factors`, or pass NAME=PCT)")
    })
}

/// `DBHxABOVExBELOW` in inches, e.g. `24x6x12`.
pub fn parse_stump(value: &str) -> Result<StumpInput, String> {
    let parts: Vec<&str> = value.split(['x', 'X']).map(str::trim).collect();
    let [dbh, above, below] = parts.as_slice() else {
        return Err(format!("expected DBHxABOVExBELOW, got `{value}`"));
    };

    let parse = |label: &str, raw: &str| {
        raw.parse::<Decimal>().map_err(|_| format!("invalid stump {label} `{raw}` in `{value}`"))
    };
    Ok(StumpInput::new(parse("dbh", dbh)?, parse("height", above)?, parse("depth", below)?))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{parse_factor, parse_stump};

    #[test]
    fn factor_names_resolve_against_catalogue() {
        let factor = parse_factor("steep slope").expect("catalogue factor");
        assert_eq!(factor.name, "Steep Slope");
        assert_eq!(factor.percentage, Decimal::from(20));
        assert!(parse_factor("Quicksand").is_err());
    }

    #[test]
    fn custom_factors_take_name_and_percentage() {
        let factor = parse_factor("Hauling Debris=12.5%").expect("custom factor");
        assert_eq!(factor.name, "Hauling Debris");
        assert_eq!(factor.percentage, Decimal::new(125, 1));
        assert!(parse_factor("Hauling=lots").is_err());
    }

    #[test]
    fn stump_triples_parse_in_inches() {
        let stump = parse_stump("24x6x12").expect("valid stump");
        assert_eq!(stump.dbh, Some(Decimal::from(24)));
        assert_eq!(stump.height_above, Some(Decimal::from(6)));
        assert_eq!(stump.depth_below, Some(Decimal::from(12)));

        assert!(parse_stump("24x6").is_err());
        assert!(parse_stump("24xsixx12").is_err());
    }
}
