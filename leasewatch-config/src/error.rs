//! Error types for configuration assembly and validation

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation error.
    #[error("Invalid configuration:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),
}

/// Renders one line per failed check, recursing into nested configuration
/// sections so `capture.interface`-style paths stay readable.
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut output = String::new();
    append_errors(&mut output, "", errors);
    output
}

fn append_errors(output: &mut String, path: &str, errors: &ValidationErrors) {
    use std::fmt::Write;

    for (field, kind) in errors.errors() {
        let field_path = if path.is_empty() {
            field.to_string()
        } else {
            format!("{path}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(msg) => msg.to_string(),
                        None => error.code.to_string(),
                    };
                    let _ = writeln!(output, "  {}: {}", field_path, message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                append_errors(output, &field_path, nested);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    append_errors(output, &format!("{field_path}[{index}]"), nested);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
