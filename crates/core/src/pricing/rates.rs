//! Every tunable pricing constant, in one table.
//!
//! The table is loaded once per deploy (defaults below, optionally patched by
//! the `[rates]` section of the config file) and handed to the calculator by
//! value. Nothing mutates it afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::input::{DbhPackage, ServiceKind};
use crate::errors::PricingError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub forestry: ForestryRates,
    pub land_clearing: LandClearingRates,
    pub stump: StumpRates,
    pub drainage: DrainageRates,
    pub transport: TransportRates,
    pub minimums: MinimumCharges,
}

/// Flat per-acre rate for each DBH package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestryRates {
    pub four_inch: Decimal,
    pub six_inch: Decimal,
    pub eight_inch: Decimal,
    pub ten_inch: Decimal,
    /// Machine rate used only to report production hours.
    pub hourly_rate: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandClearingRates {
    pub points_per_hour: Decimal,
    pub hourly_rate: Decimal,
    pub density_factor: Decimal,
    pub height_reference_ft: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StumpRates {
    pub points_per_hour: Decimal,
    pub hourly_rate: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrainageRates {
    pub per_foot_low: Decimal,
    pub per_foot_high: Decimal,
    pub feet_per_hour: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportRates {
    pub hourly_rate: Decimal,
    pub forestry_mulching_hours: Decimal,
    pub land_clearing_hours: Decimal,
    pub stump_grinding_hours: Decimal,
    pub drainage_hours: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumCharges {
    pub forestry_mulching: Decimal,
    pub land_clearing: Decimal,
    pub stump_grinding: Decimal,
    pub drainage: Decimal,
}

impl Default for ForestryRates {
    fn default() -> Self {
        Self {
            four_inch: Decimal::from(2_240),
            six_inch: Decimal::from(2_850),
            eight_inch: Decimal::from(3_600),
            ten_inch: Decimal::from(4_500),
            hourly_rate: Decimal::from(475),
        }
    }
}

impl Default for LandClearingRates {
    fn default() -> Self {
        Self {
            points_per_hour: Decimal::new(20, 1),
            hourly_rate: Decimal::from(475),
            density_factor: Decimal::new(15, 1),
            height_reference_ft: Decimal::from(100),
        }
    }
}

impl Default for StumpRates {
    fn default() -> Self {
        Self { points_per_hour: Decimal::from(8_000), hourly_rate: Decimal::from(400) }
    }
}

impl Default for DrainageRates {
    fn default() -> Self {
        Self {
            per_foot_low: Decimal::from(30),
            per_foot_high: Decimal::from(60),
            feet_per_hour: Decimal::from(40),
        }
    }
}

impl Default for TransportRates {
    fn default() -> Self {
        Self {
            hourly_rate: Decimal::from(200),
            forestry_mulching_hours: Decimal::from(2),
            land_clearing_hours: Decimal::from(2),
            stump_grinding_hours: Decimal::ZERO,
            drainage_hours: Decimal::ZERO,
        }
    }
}

impl Default for MinimumCharges {
    fn default() -> Self {
        Self {
            forestry_mulching: Decimal::from(1_800),
            land_clearing: Decimal::from(5_000),
            stump_grinding: Decimal::from(300),
            drainage: Decimal::from(1_750),
        }
    }
}

impl ForestryRates {
    pub fn per_acre(&self, package: DbhPackage) -> Decimal {
        match package {
            DbhPackage::FourInch => self.four_inch,
            DbhPackage::SixInch => self.six_inch,
            DbhPackage::EightInch => self.eight_inch,
            DbhPackage::TenInch => self.ten_inch,
        }
    }
}

impl DrainageRates {
    /// The single per-foot rate used for the headline total.
    pub fn per_foot_quoted(&self) -> Decimal {
        (self.per_foot_low + self.per_foot_high) / Decimal::TWO
    }
}

impl TransportRates {
    pub fn default_hours(&self, service: ServiceKind) -> Decimal {
        match service {
            ServiceKind::ForestryMulching => self.forestry_mulching_hours,
            ServiceKind::LandClearing => self.land_clearing_hours,
            ServiceKind::StumpGrinding => self.stump_grinding_hours,
            ServiceKind::Drainage => self.drainage_hours,
        }
    }
}

impl MinimumCharges {
    pub fn for_service(&self, service: ServiceKind) -> Decimal {
        match service {
            ServiceKind::ForestryMulching => self.forestry_mulching,
            ServiceKind::LandClearing => self.land_clearing,
            ServiceKind::StumpGrinding => self.stump_grinding,
            ServiceKind::Drainage => self.drainage,
        }
    }
}

impl RateTable {
    pub fn validate(&self) -> Result<(), PricingError> {
        let forestry = &self.forestry;
        for package in DbhPackage::ALL {
            require_positive(
                &format!("forestry.{}", forestry_field(package)),
                forestry.per_acre(package),
            )?;
        }
        for pair in DbhPackage::ALL.windows(2) {
            if forestry.per_acre(pair[1]) < forestry.per_acre(pair[0]) {
                return Err(PricingError::InvalidRateTable(format!(
                    "forestry.{} must not be lower than forestry.{}",
                    forestry_field(pair[1]),
                    forestry_field(pair[0])
                )));
            }
        }
        require_positive("forestry.hourly_rate", forestry.hourly_rate)?;

        let land = &self.land_clearing;
        require_positive("land_clearing.points_per_hour", land.points_per_hour)?;
        require_positive("land_clearing.hourly_rate", land.hourly_rate)?;
        require_positive("land_clearing.density_factor", land.density_factor)?;
        require_positive("land_clearing.height_reference_ft", land.height_reference_ft)?;

        require_positive("stump.points_per_hour", self.stump.points_per_hour)?;
        require_positive("stump.hourly_rate", self.stump.hourly_rate)?;

        let drainage = &self.drainage;
        require_positive("drainage.per_foot_low", drainage.per_foot_low)?;
        require_positive("drainage.per_foot_high", drainage.per_foot_high)?;
        require_positive("drainage.feet_per_hour", drainage.feet_per_hour)?;
        if drainage.per_foot_high < drainage.per_foot_low {
            return Err(PricingError::InvalidRateTable(
                "drainage.per_foot_high must not be lower than drainage.per_foot_low".to_string(),
            ));
        }

        let transport = &self.transport;
        require_non_negative("transport.hourly_rate", transport.hourly_rate)?;
        for service in ServiceKind::ALL {
            require_non_negative(
                &format!("transport.{}_hours", service.as_str().replace('-', "_")),
                transport.default_hours(service),
            )?;
        }

        for service in ServiceKind::ALL {
            require_non_negative(
                &format!("minimums.{}", service.as_str().replace('-', "_")),
                self.minimums.for_service(service),
            )?;
        }

        Ok(())
    }
}

fn forestry_field(package: DbhPackage) -> &'static str {
    match package {
        DbhPackage::FourInch => "four_inch",
        DbhPackage::SixInch => "six_inch",
        DbhPackage::EightInch => "eight_inch",
        DbhPackage::TenInch => "ten_inch",
    }
}

fn require_positive(field: &str, value: Decimal) -> Result<(), PricingError> {
    if value <= Decimal::ZERO {
        return Err(PricingError::InvalidRateTable(format!("{field} must be greater than zero")));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::InvalidRateTable(format!("{field} must not be negative")));
    }
    Ok(())
}
