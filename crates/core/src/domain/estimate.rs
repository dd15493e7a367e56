use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::input::{ProjectFactor, ServiceKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    Complete,
    Incomplete,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self { description: description.into(), amount }
    }
}

/// A quote plus the breakdown shown to the customer.
///
/// For complete estimates `line_items` plus `transport` add up to `total`
/// exactly; every amount is in whole dollars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub service: ServiceKind,
    pub status: EstimateStatus,
    pub total: Decimal,
    pub low: Decimal,
    pub high: Decimal,
    pub production_hours: Decimal,
    pub transport: Decimal,
    pub line_items: Vec<LineItem>,
    pub total_factor_percentage: Decimal,
    pub applied_factors: Vec<ProjectFactor>,
    pub minimum_applied: bool,
    pub methodology: String,
    pub notes: Vec<String>,
}

impl PricingResult {
    pub fn incomplete(service: ServiceKind, note: impl Into<String>) -> Self {
        Self {
            service,
            status: EstimateStatus::Incomplete,
            total: Decimal::ZERO,
            low: Decimal::ZERO,
            high: Decimal::ZERO,
            production_hours: Decimal::ZERO,
            transport: Decimal::ZERO,
            line_items: Vec::new(),
            total_factor_percentage: Decimal::ZERO,
            applied_factors: Vec::new(),
            minimum_applied: false,
            methodology: String::new(),
            notes: vec![note.into()],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == EstimateStatus::Complete
    }

    pub fn line_item_total(&self) -> Decimal {
        self.line_items.iter().map(|item| item.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{EstimateStatus, LineItem, PricingResult};
    use crate::domain::input::ServiceKind;

    #[test]
    fn incomplete_result_is_zeroed_with_a_note() {
        let result = PricingResult::incomplete(
            ServiceKind::Drainage,
            "Enter the linear footage to continue",
        );

        assert_eq!(result.status, EstimateStatus::Incomplete);
        assert!(!result.is_complete());
        assert_eq!(result.total, Decimal::ZERO);
        assert!(result.line_items.is_empty());
        assert_eq!(result.notes, vec!["Enter the linear footage to continue".to_string()]);
    }

    #[test]
    fn serializes_in_camel_case() {
        let mut result = PricingResult::incomplete(ServiceKind::StumpGrinding, "add a stump");
        result.line_items.push(LineItem::new("Stump 1", Decimal::from(518)));

        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["service"], "stump-grinding");
        assert_eq!(value["status"], "incomplete");
        assert!(value.get("lineItems").is_some());
        assert!(value.get("totalFactorPercentage").is_some());
        assert_eq!(result.line_item_total(), Decimal::from(518));
    }
}
