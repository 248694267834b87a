//! Configuration validation
//!
//! Rules:
//! - declared ranges on `ExportBlueprint` fields (validator derives)
//! - table_name is a plain SQL identifier
//! - output.url uses http or https
//! - output.path has a supported suffix, unless output.url replaces it
//! - delivery durations are finite
//! - success_statuses are real HTTP status codes

use contracts::{ContractError, ExportBlueprint, OutputFormat};
use validator::{Validate, ValidationErrors};

/// Validate ExportBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ExportBlueprint) -> Result<(), ContractError> {
    validate_finite_durations(blueprint)?;
    validate_declared_ranges(blueprint)?;
    validate_table_name(blueprint)?;
    validate_url(blueprint)?;
    validate_output_path(blueprint)?;
    validate_success_statuses(blueprint)?;
    Ok(())
}

/// `range` lets NaN through; catch it before it becomes a zero Duration
fn validate_finite_durations(blueprint: &ExportBlueprint) -> Result<(), ContractError> {
    let delivery = &blueprint.delivery;
    for (field, value) in [
        ("delivery.retry_delay_secs", delivery.retry_delay_secs),
        ("delivery.timeout_secs", delivery.timeout_secs),
    ] {
        if !value.is_finite() {
            return Err(ContractError::config_validation(
                field,
                format!("{value} is not a finite number of seconds"),
            ));
        }
    }
    Ok(())
}

fn validate_declared_ranges(blueprint: &ExportBlueprint) -> Result<(), ContractError> {
    blueprint.validate().map_err(|errors| {
        let (field, message) = first_violation(&errors);
        ContractError::config_validation(field, message)
    })
}

/// Flatten nested validator errors down to the first `section.field` path
fn first_violation(errors: &ValidationErrors) -> (String, String) {
    use validator::ValidationErrorsKind;

    for (name, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(list) => {
                let message = list
                    .first()
                    .map(|e| format!("failed '{}' constraint", e.code))
                    .unwrap_or_else(|| "invalid value".to_string());
                return (name.to_string(), message);
            }
            ValidationErrorsKind::Struct(inner) => {
                let (field, message) = first_violation(inner);
                return (format!("{name}.{field}"), message);
            }
            ValidationErrorsKind::List(items) => {
                if let Some((idx, inner)) = items.iter().next() {
                    let (field, message) = first_violation(inner);
                    return (format!("{name}[{idx}].{field}"), message);
                }
            }
        }
    }
    ("<root>".to_string(), "invalid configuration".to_string())
}

/// Table name is interpolated into DDL, so only identifiers are allowed
fn validate_table_name(blueprint: &ExportBlueprint) -> Result<(), ContractError> {
    let name = &blueprint.output.table_name;
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !head_ok || !tail_ok {
        return Err(ContractError::config_validation(
            "output.table_name",
            format!("'{name}' is not a valid identifier ([A-Za-z_][A-Za-z0-9_]*)"),
        ));
    }
    Ok(())
}

fn validate_url(blueprint: &ExportBlueprint) -> Result<(), ContractError> {
    if let Some(url) = &blueprint.output.url {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ContractError::config_validation(
                "output.url",
                format!("scheme must be http or https, got '{}'", url.scheme()),
            ));
        }
    }
    Ok(())
}

/// The path is never written when a URL is set, so its suffix is not checked
fn validate_output_path(blueprint: &ExportBlueprint) -> Result<(), ContractError> {
    if blueprint.output.url.is_some() {
        return Ok(());
    }
    if let Some(path) = &blueprint.output.path {
        OutputFormat::from_path(path)
            .map_err(|e| ContractError::config_validation("output.path", e.to_string()))?;
    }
    Ok(())
}

fn validate_success_statuses(blueprint: &ExportBlueprint) -> Result<(), ContractError> {
    for (idx, status) in blueprint.delivery.success_statuses.iter().enumerate() {
        if !(100..=599).contains(status) {
            return Err(ContractError::config_validation(
                format!("delivery.success_statuses[{idx}]"),
                format!("{status} is not an HTTP status code"),
            ));
        }
    }
    Ok(())
}
