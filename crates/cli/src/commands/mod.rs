pub mod config;
pub mod deposit;
pub mod estimate;
pub mod factors;
pub mod quote;

use landquote_core::config::{AppConfig, LoadOptions};
use landquote_core::EstimateCalculator;
use serde::Serialize;
use serde_json::Value;

pub const EXIT_CONFIG_FAILURE: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn success_with(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn invalid_input(command: &str, message: impl Into<String>) -> Self {
        Self::failure(command, "invalid_input", message, EXIT_INVALID_INPUT)
    }
}

/// Loads the effective config and a calculator over its rate table. Any
/// failure is already rendered as the command's config error.
pub(crate) fn load_calculator(
    command: &str,
) -> Result<(AppConfig, EstimateCalculator), CommandResult> {
    let config_failure = |message: String| {
        CommandResult::failure(command, "config_validation", message, EXIT_CONFIG_FAILURE)
    };

    let config = AppConfig::load(LoadOptions::default())
        .map_err(|error| config_failure(format!("configuration issue: {error}")))?;
    let calculator = EstimateCalculator::new(config.rates.clone())
        .map_err(|error| config_failure(format!("configuration issue: {error}")))?;
    Ok((config, calculator))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
