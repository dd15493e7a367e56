use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error(
        "unrecognized service type `{0}` (expected forestry-mulching|land-clearing|stump-grinding|drainage)"
    )]
    InvalidServiceType(String),
    #[error("malformed pricing input: {0}")]
    MalformedInput(String),
    #[error("invalid rate table: {0}")]
    InvalidRateTable(String),
    #[error("invalid deposit percentage {0} (expected greater than 0 and at most 100)")]
    InvalidDepositPercentage(Decimal),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("lead sink failure: {0}")]
    LeadSink(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Pricing(
                error @ (PricingError::InvalidServiceType(_) | PricingError::MalformedInput(_)),
            ) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Pricing(error) => {
                Self::Internal { message: error.to_string(), correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::LeadSink(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::errors::{ApplicationError, InterfaceError, PricingError};

    #[test]
    fn invalid_service_maps_to_bad_request_interface_error() {
        let interface =
            ApplicationError::from(PricingError::InvalidServiceType("hauling".to_owned()))
                .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message.contains("hauling")
        ));
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let interface =
            ApplicationError::from(PricingError::MalformedInput("acres: expected number".into()))
                .into_interface("req-2");

        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn lead_sink_error_maps_to_service_unavailable() {
        let interface =
            ApplicationError::LeadSink("crm webhook timed out".to_owned()).into_interface("req-3");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(
            interface.user_message(),
            "The service is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn rate_table_and_deposit_errors_map_to_internal() {
        let rates = ApplicationError::from(PricingError::InvalidRateTable(
            "stump.points_per_hour must be greater than zero".to_owned(),
        ))
        .into_interface("req-4");
        assert!(matches!(rates, InterfaceError::Internal { .. }));

        let deposit =
            ApplicationError::from(PricingError::InvalidDepositPercentage(Decimal::from(150)))
                .into_interface("req-5");
        assert!(matches!(deposit, InterfaceError::Internal { .. }));
        assert_eq!(deposit.user_message(), "An unexpected internal error occurred.");
    }
}
