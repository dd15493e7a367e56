use landquote_core::FACTOR_CATALOGUE;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct FactorRow {
    name: &'static str,
    category: &'static str,
    percentage: u32,
}

pub fn run() -> CommandResult {
    let rows: Vec<FactorRow> = FACTOR_CATALOGUE
        .iter()
        .map(|factor| FactorRow {
            name: factor.name,
            category: factor.category.label(),
            percentage: factor.percentage,
        })
        .collect();

    CommandResult::success_with(
        "factors",
        format!("{} project factors available", rows.len()),
        rows,
    )
}
