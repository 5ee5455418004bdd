//! Error types for Waflow

use thiserror::Error;

/// Main error type for Waflow
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Template '{name}' is not approved (status: {status})")]
    NotApproved { name: String, status: String },

    #[error("Template requires {required} parameters but {provided} provided")]
    ParameterCountMismatch { required: usize, provided: usize },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Delivery failed ({status}): {body}")]
    Delivery { status: u16, body: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Waflow
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config(_) => 500,
            Error::Storage(_) => 500,
            Error::MissingField(_) => 400,
            Error::NotFound(_) => 404,
            Error::NotApproved { .. } => 400,
            Error::ParameterCountMismatch { .. } => 400,
            Error::InvalidPayload(_) => 400,
            Error::InvalidSignature => 403,
            // Provider rejections are normalized to a client-style error
            // regardless of the status the provider answered with.
            Error::Delivery { .. } => 400,
            Error::Provider(_) => 502,
            Error::Internal(_) => 500,
            Error::Other(_) => 500,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::MissingField(_) => "MISSING_FIELD",
            Error::NotFound(_) => "NOT_FOUND",
            Error::NotApproved { .. } => "TEMPLATE_NOT_APPROVED",
            Error::ParameterCountMismatch { .. } => "PARAMETER_COUNT_MISMATCH",
            Error::InvalidPayload(_) => "INVALID_PAYLOAD",
            Error::InvalidSignature => "INVALID_SIGNATURE",
            Error::Delivery { .. } => "DELIVERY_FAILED",
            Error::Provider(_) => "PROVIDER_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::MissingField("name".into()).status_code(), 400);
        assert_eq!(Error::NotFound("campaign abc".into()).status_code(), 404);
        assert_eq!(Error::InvalidSignature.status_code(), 403);
        assert_eq!(
            Error::Delivery {
                status: 500,
                body: "{}".into()
            }
            .status_code(),
            400
        );
    }

    #[test]
    fn test_parameter_mismatch_message() {
        let err = Error::ParameterCountMismatch {
            required: 2,
            provided: 1,
        };
        assert_eq!(
            err.to_string(),
            "Template requires 2 parameters but 1 provided"
        );
    }

    #[test]
    fn test_not_approved_message() {
        let err = Error::NotApproved {
            name: "welcome_msg".into(),
            status: "PENDING".into(),
        };
        assert_eq!(
            err.to_string(),
            "Template 'welcome_msg' is not approved (status: PENDING)"
        );
    }
}
