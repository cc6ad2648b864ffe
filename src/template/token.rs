use crate::error::{RegistryError, Result};
use regex::Regex;
use std::fmt;

/// Literal marker inside a template that must be replaced before the SQL is valid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderToken(&'static str);

impl PlaceholderToken {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl AsRef<str> for PlaceholderToken {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Display for PlaceholderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Check a template's declared token set against its text.
///
/// Every token must be an upper-case marker (`[A-Z][A-Z0-9_]*`), declared once,
/// present in the text, and not a substring of any other token of the same
/// template. The last rule is what makes replacement order irrelevant.
pub fn validate_tokens(template: &str, text: &str, tokens: &[PlaceholderToken]) -> Result<()> {
    let shape = Regex::new(r"^[A-Z][A-Z0-9_]*$")?;
    let invalid = |cause: String| RegistryError::InvalidTemplate {
        template: template.to_string(),
        cause,
    };

    for (i, token) in tokens.iter().enumerate() {
        if !shape.is_match(token.as_str()) {
            return Err(invalid(format!(
                "placeholder '{}' must be upper-case letters, digits and underscores",
                token
            )));
        }

        if !text.contains(token.as_str()) {
            return Err(invalid(format!("placeholder {} does not occur in the text", token)));
        }

        for other in &tokens[i + 1..] {
            if token == other {
                return Err(invalid(format!("placeholder {} is declared twice", token)));
            }
            if token.as_str().contains(other.as_str()) || other.as_str().contains(token.as_str()) {
                return Err(invalid(format!(
                    "placeholders {} and {} overlap",
                    token, other
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: PlaceholderToken = PlaceholderToken::new("PROJECT_NAME");
    const NUMBER: PlaceholderToken = PlaceholderToken::new("PROJECT_NUMBER");

    #[test]
    fn test_valid_tokens() {
        let text = "INSERT INTO project VALUES (PROJECT_NUMBER, 'PROJECT_NAME');";
        assert!(validate_tokens("t", text, &[NAME, NUMBER]).is_ok());
        assert!(validate_tokens("t", text, &[]).is_ok());
    }

    #[test]
    fn test_overlapping_tokens() {
        let text = "SELECT COLUMN, COLUMN_LENGTH;";
        let err = validate_tokens(
            "t",
            text,
            &[
                PlaceholderToken::new("COLUMN_LENGTH"),
                PlaceholderToken::new("COLUMN"),
            ],
        )
        .unwrap_err();

        assert_eq!(err.error_code(), "invalid_template");
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_duplicate_token() {
        let text = "SELECT PROJECT_NAME;";
        let err = validate_tokens("t", text, &[NAME, NAME]).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_token_missing_from_text() {
        let err = validate_tokens("t", "SELECT PROJECT_NAME;", &[NAME, NUMBER]).unwrap_err();
        assert!(err.to_string().contains("PROJECT_NUMBER"));
    }

    #[test]
    fn test_token_shape() {
        let err = validate_tokens("t", "SELECT $name;", &[PlaceholderToken::new("$name")]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidTemplate {
                template: "t".to_string(),
                cause: "placeholder '$name' must be upper-case letters, digits and underscores"
                    .to_string(),
            }
        );
    }
}
