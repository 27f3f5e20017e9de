use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Failed to fetch sheet '{sheet}': {message}")]
    SheetFetch { sheet: String, message: String },

    #[error("Failed to write sheet '{sheet}': {message}")]
    SheetWrite { sheet: String, message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Upstream timeout: {service}")]
    UpstreamTimeout { service: String },

    #[error("Upstream error: {service} - {message}")]
    Upstream { service: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn sheet_fetch(sheet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SheetFetch {
            sheet: sheet.into(),
            message: message.into(),
        }
    }

    pub fn sheet_write(sheet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SheetWrite {
            sheet: sheet.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    pub fn upstream_timeout(service: impl Into<String>) -> Self {
        Self::UpstreamTimeout {
            service: service.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a retry of the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::UpstreamTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_fetch_error() {
        let error = DomainError::sheet_fetch("Cities", "HTTP 403");
        assert_eq!(error.to_string(), "Failed to fetch sheet 'Cities': HTTP 403");
    }

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("City 'atlantis' not found");
        assert_eq!(error.to_string(), "Not found: City 'atlantis' not found");
    }

    #[test]
    fn test_transient_classification() {
        assert!(DomainError::upstream("shutterstock", "HTTP 502").is_transient());
        assert!(DomainError::upstream_timeout("shutterstock").is_transient());
        assert!(!DomainError::rate_limited("HTTP 429").is_transient());
        assert!(!DomainError::configuration("missing key").is_transient());
    }
}
