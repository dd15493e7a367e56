use std::env;
use std::fs;
use std::path::Path;

use landquote_core::config::{resolve_config_path, AppConfig, LoadOptions};
use serde::Serialize;
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG_FAILURE};

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: String,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG_FAILURE,
            );
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let attribution =
        Attribution { doc: config_file_doc.as_ref(), path: config_file_path.as_deref() };

    let rates = &config.rates;
    let mut entries = vec![
        attribution.entry(
            "server.bind_address",
            &config.server.bind_address,
            &["LANDQUOTE_SERVER_BIND_ADDRESS"],
        ),
        attribution.entry("server.port", &config.server.port, &["LANDQUOTE_SERVER_PORT"]),
        attribution.entry(
            "server.graceful_shutdown_secs",
            &config.server.graceful_shutdown_secs,
            &["LANDQUOTE_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        attribution.entry(
            "checkout.deposit_pct",
            &config.checkout.deposit_pct,
            &["LANDQUOTE_CHECKOUT_DEPOSIT_PCT"],
        ),
        attribution.entry(
            "logging.level",
            &config.logging.level,
            &["LANDQUOTE_LOGGING_LEVEL", "LANDQUOTE_LOG_LEVEL"],
        ),
        attribution.entry(
            "logging.format",
            &format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["LANDQUOTE_LOGGING_FORMAT", "LANDQUOTE_LOG_FORMAT"],
        ),
    ];

    let rate_values = [
        ("rates.forestry.four_inch", rates.forestry.four_inch),
        ("rates.forestry.six_inch", rates.forestry.six_inch),
        ("rates.forestry.eight_inch", rates.forestry.eight_inch),
        ("rates.forestry.ten_inch", rates.forestry.ten_inch),
        ("rates.forestry.hourly_rate", rates.forestry.hourly_rate),
        ("rates.land_clearing.points_per_hour", rates.land_clearing.points_per_hour),
        ("rates.land_clearing.hourly_rate", rates.land_clearing.hourly_rate),
        ("rates.land_clearing.density_factor", rates.land_clearing.density_factor),
        ("rates.land_clearing.height_reference_ft", rates.land_clearing.height_reference_ft),
        ("rates.stump.points_per_hour", rates.stump.points_per_hour),
        ("rates.stump.hourly_rate", rates.stump.hourly_rate),
        ("rates.drainage.per_foot_low", rates.drainage.per_foot_low),
        ("rates.drainage.per_foot_high", rates.drainage.per_foot_high),
        ("rates.drainage.feet_per_hour", rates.drainage.feet_per_hour),
        ("rates.transport.hourly_rate", rates.transport.hourly_rate),
        ("rates.minimums.forestry_mulching", rates.minimums.forestry_mulching),
        ("rates.minimums.land_clearing", rates.minimums.land_clearing),
        ("rates.minimums.stump_grinding", rates.minimums.stump_grinding),
        ("rates.minimums.drainage", rates.minimums.drainage),
    ];
    entries.extend(rate_values.iter().map(|(key, value)| attribution.entry(key, value, &[])));

    CommandResult::success_with(
        COMMAND,
        "effective config (source precedence: env > file > default)",
        entries,
    )
}

struct Attribution<'a> {
    doc: Option<&'a Value>,
    path: Option<&'a Path>,
}

impl Attribution<'_> {
    fn entry(&self, key: &str, value: &impl ToString, env_keys: &[&str]) -> ConfigEntry {
        ConfigEntry {
            key: key.to_string(),
            value: value.to_string(),
            source: self.source(key, env_keys),
        }
    }

    fn source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
