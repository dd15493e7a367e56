pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use domain::estimate::{EstimateStatus, LineItem, PricingResult};
pub use domain::input::{
    DbhPackage, DrainageInput, ForestryMulchingInput, LandClearingInput, PricingInput,
    ProjectFactor, ServiceInput, ServiceKind, StumpGrindingInput, StumpInput,
};
pub use errors::{ApplicationError, InterfaceError, PricingError};
pub use pricing::checkout::{deposit_for_package, DepositQuote, DEFAULT_DEPOSIT_PCT};
pub use pricing::drainage::DrainagePackage;
pub use pricing::engine::{calculate_estimate, EstimateCalculator, PricingEngine};
pub use pricing::factors::{CatalogueFactor, FactorCategory, FACTOR_CATALOGUE};
pub use pricing::rates::RateTable;
