use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unknown database identifier: {identifier}")]
    UnknownIdentifier { identifier: String },

    #[error("Unknown dynamic template: {name}")]
    UnknownTemplate { name: String },

    #[error("Missing substitution for {token} in template {template}")]
    MissingSubstitution { template: String, token: String },

    #[error("Substitution {token} is not declared by template {template}")]
    UnusedSubstitution { template: String, token: String },

    #[error("Substitution value for {token} in template {template} produces placeholder {nested}")]
    NestedPlaceholder {
        template: String,
        token: String,
        nested: String,
    },

    #[error("Invalid template {template}: {cause}")]
    InvalidTemplate { template: String, cause: String },

    #[error("Duplicate database identifier: {identifier}")]
    DuplicateIdentifier { identifier: String },

    #[error("Failed to load resource {path}: {cause}")]
    ResourceLoad { path: String, cause: String },

    #[error("Provisioning failed for {identifier}: {cause}")]
    ProvisionFailed { identifier: String, cause: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl RegistryError {
    /// Stable snake_case code for the error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::UnknownIdentifier { .. } => "unknown_identifier",
            RegistryError::UnknownTemplate { .. } => "unknown_template",
            RegistryError::MissingSubstitution { .. } => "missing_substitution",
            RegistryError::UnusedSubstitution { .. } => "unused_substitution",
            RegistryError::NestedPlaceholder { .. } => "nested_placeholder",
            RegistryError::InvalidTemplate { .. } => "invalid_template",
            RegistryError::DuplicateIdentifier { .. } => "duplicate_identifier",
            RegistryError::ResourceLoad { .. } => "resource_load_failed",
            RegistryError::ProvisionFailed { .. } => "provision_failed",
            RegistryError::Internal(_) => "internal_error",
        }
    }

    /// The identifier, template or path the error is about, if any
    pub fn subject(&self) -> Option<&str> {
        match self {
            RegistryError::UnknownIdentifier { identifier }
            | RegistryError::DuplicateIdentifier { identifier }
            | RegistryError::ProvisionFailed { identifier, .. } => Some(identifier.as_str()),
            RegistryError::UnknownTemplate { name } => Some(name.as_str()),
            RegistryError::MissingSubstitution { template, .. }
            | RegistryError::UnusedSubstitution { template, .. }
            | RegistryError::NestedPlaceholder { template, .. }
            | RegistryError::InvalidTemplate { template, .. } => Some(template.as_str()),
            RegistryError::ResourceLoad { path, .. } => Some(path.as_str()),
            RegistryError::Internal(_) => None,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
            subject: self.subject().map(str::to_string),
        }
    }
}

impl From<regex::Error> for RegistryError {
    fn from(err: regex::Error) -> Self {
        RegistryError::Internal(format!("Regex error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = RegistryError::MissingSubstitution {
            template: "hopsworks_add_project".to_string(),
            token: "PROJECT_NUMBER".to_string(),
        };

        let response = err.to_response();
        assert_eq!(response.error, "missing_substitution");
        assert_eq!(response.subject.as_deref(), Some("hopsworks_add_project"));
        assert!(response.message.contains("PROJECT_NUMBER"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "missing_substitution");
    }

    #[test]
    fn test_internal_has_no_subject() {
        let response = RegistryError::Internal("boom".to_string()).to_response();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("subject").is_none());
    }
}
