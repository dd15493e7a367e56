use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use serde_json::Value;

use crate::commands::{load_calculator, CommandResult};

const COMMAND: &str = "estimate";

/// Prices a JSON `PricingInput` read from `source` (a file path, or `-` for
/// stdin).
pub fn run(source: &str) -> CommandResult {
    let raw = match read_source(source) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::invalid_input(COMMAND, format!("{error:#}"));
        }
    };
    evaluate(&raw)
}

pub fn evaluate(raw: &str) -> CommandResult {
    let payload = match serde_json::from_str::<Value>(raw) {
        Ok(payload) => payload,
        Err(error) => {
            return CommandResult::invalid_input(COMMAND, format!("input is not valid JSON: {error}"));
        }
    };

    let (_, calculator) = match load_calculator(COMMAND) {
        Ok(loaded) => loaded,
        Err(result) => return result,
    };

    match calculator.calculate_json(&payload) {
        Ok(result) => {
            let message = if result.is_complete() {
                format!("{} estimate computed", result.service.display_name())
            } else {
                format!("{} estimate is incomplete", result.service.display_name())
            };
            CommandResult::success_with(COMMAND, message, result)
        }
        Err(error) => CommandResult::invalid_input(COMMAND, error.to_string()),
    }
}

fn read_source(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw).context("could not read input from stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(source).with_context(|| format!("could not read input `{source}`"))
}
