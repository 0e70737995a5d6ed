/// Error taxonomy for the application.
///
/// Every failure is classified before it reaches a flow boundary:
/// validation failures never leave the process, configuration failures
/// point at the credential, service failures cover transport and provider
/// problems, and format failures cover malformed structured output.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Format error: {0}")]
    Format(String),
}

impl Error {
    /// User-readable message for the generation flow boundary.
    pub fn generation_message(&self) -> String {
        self.boundary_message("Failed to generate contract from AI service. The service may be busy.")
    }

    /// User-readable message for the debugging flow boundary.
    pub fn debugging_message(&self) -> String {
        self.boundary_message("Failed to debug contract from AI service. The service may be busy.")
    }

    fn boundary_message(&self, service_message: &str) -> String {
        match self {
            Error::Validation(message) => message.clone(),
            Error::Config(_) => {
                "The API key is invalid or missing. Please check your configuration.".to_string()
            }
            Error::Format(_) => {
                "The AI service returned an invalid format. Please try again.".to_string()
            }
            Error::Service(_) => service_message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_map_to_api_key_message() {
        let error = Error::Config("GEMINI_API_KEY environment variable not set".to_string());
        assert_eq!(
            error.generation_message(),
            "The API key is invalid or missing. Please check your configuration."
        );
        assert_eq!(error.generation_message(), error.debugging_message());
    }

    #[test]
    fn test_format_errors_map_to_invalid_format_message() {
        let error = Error::Format("Invalid debug response JSON: expected value".to_string());
        assert_eq!(
            error.debugging_message(),
            "The AI service returned an invalid format. Please try again."
        );
    }

    #[test]
    fn test_service_errors_are_flow_specific() {
        let error = Error::Service("HTTP 503".to_string());
        assert_eq!(
            error.generation_message(),
            "Failed to generate contract from AI service. The service may be busy."
        );
        assert_eq!(
            error.debugging_message(),
            "Failed to debug contract from AI service. The service may be busy."
        );
    }

    #[test]
    fn test_validation_errors_pass_through() {
        let error = Error::Validation("Please enter a description for the contract.".to_string());
        assert_eq!(
            error.generation_message(),
            "Please enter a description for the contract."
        );
    }

    #[test]
    fn test_display_includes_class_and_detail() {
        let error = Error::Service("connection refused".to_string());
        assert_eq!(error.to_string(), "Service error: connection refused");
    }
}
