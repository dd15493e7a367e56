use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::PricingError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    ForestryMulching,
    LandClearing,
    StumpGrinding,
    Drainage,
}

impl ServiceKind {
    pub const ALL: [Self; 4] =
        [Self::ForestryMulching, Self::LandClearing, Self::StumpGrinding, Self::Drainage];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForestryMulching => "forestry-mulching",
            Self::LandClearing => "land-clearing",
            Self::StumpGrinding => "stump-grinding",
            Self::Drainage => "drainage",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::ForestryMulching => "forestry mulching",
            Self::LandClearing => "land clearing",
            Self::StumpGrinding => "stump grinding",
            Self::Drainage => "drainage",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| PricingError::InvalidServiceType(value.trim().to_string()))
    }
}

/// Coarse diameter band used to bucket a property by its largest trees.
///
/// Serialized as the band's inch count (`"6"`); numbers and labels such as
/// `6in` or `6"` are accepted on input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DbhPackageRepr", into = "String")]
pub enum DbhPackage {
    FourInch,
    SixInch,
    EightInch,
    TenInch,
}

impl DbhPackage {
    pub const ALL: [Self; 4] = [Self::FourInch, Self::SixInch, Self::EightInch, Self::TenInch];

    pub fn inches(self) -> u32 {
        match self {
            Self::FourInch => 4,
            Self::SixInch => 6,
            Self::EightInch => 8,
            Self::TenInch => 10,
        }
    }

    pub fn from_inches(inches: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|package| package.inches() == inches)
    }

    pub fn label(self) -> String {
        format!("{}\" DBH", self.inches())
    }
}

impl FromStr for DbhPackage {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().to_ascii_lowercase();
        let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
        let suffix = trimmed[digits.len()..].trim();
        let known_suffix = matches!(suffix, "" | "\"" | "in" | "inch" | "inches" | "in." | "\" dbh");

        digits
            .parse::<u32>()
            .ok()
            .filter(|_| known_suffix)
            .and_then(Self::from_inches)
            .ok_or_else(|| {
                PricingError::MalformedInput(format!(
                    "unknown DBH package `{}` (expected 4|6|8|10)",
                    value.trim()
                ))
            })
    }
}

impl From<DbhPackage> for String {
    fn from(value: DbhPackage) -> Self {
        value.inches().to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DbhPackageRepr {
    Inches(u32),
    Label(String),
}

impl TryFrom<DbhPackageRepr> for DbhPackage {
    type Error = PricingError;

    fn try_from(value: DbhPackageRepr) -> Result<Self, Self::Error> {
        match value {
            DbhPackageRepr::Inches(inches) => Self::from_inches(inches).ok_or_else(|| {
                PricingError::MalformedInput(format!(
                    "unknown DBH package `{inches}` (expected 4|6|8|10)"
                ))
            }),
            DbhPackageRepr::Label(label) => label.parse(),
        }
    }
}

/// A named percentage surcharge for a site-condition complication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFactor {
    pub name: String,
    pub percentage: Decimal,
}

impl ProjectFactor {
    pub fn new(name: impl Into<String>, percentage: Decimal) -> Self {
        Self { name: name.into(), percentage }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestryMulchingInput {
    pub acres: Option<Decimal>,
    pub dbh_package: Option<DbhPackage>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandClearingInput {
    pub acres: Option<Decimal>,
    #[serde(alias = "avgDBH")]
    pub avg_dbh: Option<Decimal>,
    pub avg_height: Option<Decimal>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StumpInput {
    pub dbh: Option<Decimal>,
    pub height_above: Option<Decimal>,
    pub depth_below: Option<Decimal>,
}

impl StumpInput {
    pub fn new(dbh: Decimal, height_above: Decimal, depth_below: Decimal) -> Self {
        Self { dbh: Some(dbh), height_above: Some(height_above), depth_below: Some(depth_below) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StumpGrindingInput {
    #[serde(default)]
    pub stumps: Vec<StumpInput>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainageInput {
    pub linear_feet: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "kebab-case")]
pub enum ServiceInput {
    ForestryMulching(ForestryMulchingInput),
    LandClearing(LandClearingInput),
    StumpGrinding(StumpGrindingInput),
    Drainage(DrainageInput),
}

impl ServiceInput {
    pub fn kind(&self) -> ServiceKind {
        match self {
            Self::ForestryMulching(_) => ServiceKind::ForestryMulching,
            Self::LandClearing(_) => ServiceKind::LandClearing,
            Self::StumpGrinding(_) => ServiceKind::StumpGrinding,
            Self::Drainage(_) => ServiceKind::Drainage,
        }
    }
}

/// Everything the calculator needs for one quote.
///
/// Measurements are optional because interactive callers submit whatever the
/// customer has typed so far; the calculator reports missing values as an
/// incomplete estimate instead of failing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInput {
    #[serde(flatten)]
    pub service: ServiceInput,
    #[serde(default)]
    pub project_factors: Vec<ProjectFactor>,
    /// Round-trip hours from an external location lookup. Falls back to the
    /// rate table's default for the service when absent.
    #[serde(default)]
    pub transport_hours: Option<Decimal>,
}

impl PricingInput {
    pub fn new(service: ServiceInput) -> Self {
        Self { service, project_factors: Vec::new(), transport_hours: None }
    }

    pub fn forestry_mulching(acres: Decimal, dbh_package: DbhPackage) -> Self {
        Self::new(ServiceInput::ForestryMulching(ForestryMulchingInput {
            acres: Some(acres),
            dbh_package: Some(dbh_package),
        }))
    }

    pub fn land_clearing(acres: Decimal, avg_dbh: Decimal, avg_height: Decimal) -> Self {
        Self::new(ServiceInput::LandClearing(LandClearingInput {
            acres: Some(acres),
            avg_dbh: Some(avg_dbh),
            avg_height: Some(avg_height),
        }))
    }

    pub fn stump_grinding(stumps: Vec<StumpInput>) -> Self {
        Self::new(ServiceInput::StumpGrinding(StumpGrindingInput { stumps }))
    }

    pub fn drainage(linear_feet: Decimal) -> Self {
        Self::new(ServiceInput::Drainage(DrainageInput { linear_feet: Some(linear_feet) }))
    }

    pub fn with_factor(mut self, factor: ProjectFactor) -> Self {
        self.project_factors.push(factor);
        self
    }

    pub fn with_transport_hours(mut self, hours: Decimal) -> Self {
        self.transport_hours = Some(hours);
        self
    }

    pub fn service_kind(&self) -> ServiceKind {
        self.service.kind()
    }

    /// Parses an untyped payload, separating an unknown service tag (a caller
    /// bug) from a payload whose fields have the wrong shape.
    pub fn from_json(value: &Value) -> Result<Self, PricingError> {
        let Some(object) = value.as_object() else {
            return Err(PricingError::MalformedInput(
                "pricing input must be a JSON object".to_string(),
            ));
        };
        let tag = match object.get("service") {
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => return Err(PricingError::InvalidServiceType(other.to_string())),
            None => return Err(PricingError::InvalidServiceType("<missing>".to_string())),
        };
        let kind = tag.parse::<ServiceKind>()?;

        let mut normalized = value.clone();
        if let Some(object) = normalized.as_object_mut() {
            object.insert("service".to_string(), Value::String(kind.as_str().to_string()));
        }

        serde_json::from_value(normalized)
            .map_err(|error| PricingError::MalformedInput(error.to_string()))
    }
}
