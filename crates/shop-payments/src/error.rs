//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Checkout input rejected before any gateway call
    #[error("Invalid checkout request: {0}")]
    InvalidRequest(String),

    /// Gateway session-creation failure (including timeout)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    SignatureInvalid(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Confirmation notification failure (non-fatal, never rolls back a record)
    #[error("Notification error: {0}")]
    Notification(String),

    /// Transaction storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::Gateway(_) | PaymentError::Storage(_) | PaymentError::Notification(_)
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::InvalidRequest(_) => {
                "Your cart could not be submitted. Please review it and try again."
            }
            PaymentError::Gateway(_) => "Payment processing failed. Please try again.",
            PaymentError::Config(_) => "Service configuration error.",
            _ => "An error occurred processing your request.",
        }
    }
}
