//! Site-condition surcharges.
//!
//! Selected factors behave as a set: a name counts once no matter how often
//! it is submitted, and percentages are summed rather than compounded.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::input::ProjectFactor;
use crate::pricing::format::{format_percent, round_dollars};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    VegetationDensity,
    SiteAccess,
    Terrain,
}

impl FactorCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::VegetationDensity => "Vegetation density",
            Self::SiteAccess => "Site access",
            Self::Terrain => "Terrain",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogueFactor {
    pub name: &'static str,
    pub category: FactorCategory,
    pub percentage: u32,
}

impl CatalogueFactor {
    pub fn to_project_factor(self) -> ProjectFactor {
        ProjectFactor::new(self.name, Decimal::from(self.percentage))
    }
}

pub const FACTOR_CATALOGUE: [CatalogueFactor; 9] = [
    CatalogueFactor {
        name: "Heavy Palmetto Undergrowth",
        category: FactorCategory::VegetationDensity,
        percentage: 15,
    },
    CatalogueFactor {
        name: "Dense Vine Cover",
        category: FactorCategory::VegetationDensity,
        percentage: 10,
    },
    CatalogueFactor {
        name: "Thick Brush Understory",
        category: FactorCategory::VegetationDensity,
        percentage: 10,
    },
    CatalogueFactor {
        name: "Limited Equipment Access",
        category: FactorCategory::SiteAccess,
        percentage: 10,
    },
    CatalogueFactor {
        name: "Gated or Narrow Entry",
        category: FactorCategory::SiteAccess,
        percentage: 5,
    },
    CatalogueFactor {
        name: "Work Near Structures",
        category: FactorCategory::SiteAccess,
        percentage: 15,
    },
    CatalogueFactor { name: "Steep Slope", category: FactorCategory::Terrain, percentage: 20 },
    CatalogueFactor {
        name: "Wet or Soft Ground",
        category: FactorCategory::Terrain,
        percentage: 15,
    },
    CatalogueFactor { name: "Rocky Soil", category: FactorCategory::Terrain, percentage: 10 },
];

pub fn catalogue_factor(name: &str) -> Option<CatalogueFactor> {
    let key = factor_key(name);
    FACTOR_CATALOGUE.into_iter().find(|factor| factor_key(factor.name) == key)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactorSelection {
    pub applied: Vec<ProjectFactor>,
    pub total_percentage: Decimal,
    pub notes: Vec<String>,
}

impl FactorSelection {
    /// Markup on the pre-transport subtotal, in whole dollars. `None` when
    /// the markup overflows.
    pub fn uplift(&self, subtotal: Decimal) -> Option<Decimal> {
        subtotal
            .checked_mul(self.total_percentage)?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(round_dollars)
    }
}

pub fn select_factors(requested: &[ProjectFactor]) -> FactorSelection {
    let mut selection = FactorSelection::default();
    let mut seen = HashSet::new();

    for factor in requested {
        let key = factor_key(&factor.name);
        if key.is_empty() {
            selection.notes.push("Ignored a project factor with no name".to_string());
            continue;
        }
        if !seen.insert(key) {
            continue;
        }
        if factor.percentage < Decimal::ZERO || factor.percentage > Decimal::ONE_HUNDRED {
            selection.notes.push(format!(
                "Ignored project factor \"{}\": {} is outside 0-100%",
                factor.name.trim(),
                format_percent(factor.percentage)
            ));
            continue;
        }

        let Some(total) = selection.total_percentage.checked_add(factor.percentage) else {
            selection.notes.push(format!("Ignored project factor \"{}\"", factor.name.trim()));
            continue;
        };
        selection.total_percentage = total;
        selection.applied.push(ProjectFactor::new(factor.name.trim(), factor.percentage));
    }

    selection
}

fn factor_key(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
