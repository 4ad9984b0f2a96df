//! JSA submission validation.
//!
//! Field rules are declared on [`JsaInput`] with `validator` derives; this
//! module holds the custom rule functions and turns `ValidationErrors` into
//! flat `(path, message)` pairs such as `steps[1].hazards`.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::FieldError;
use crate::models::{JsaInput, JsaStatus, NewJsa, NewJsaStep, StepInput, ValidatedJsa};

/// Minimum task length, counted in characters after trimming.
pub const MIN_TASK_LEN: usize = 5;

/// Zero-padded `YYYY-MM-DD`. chrono alone also accepts `2024-1-5`.
static REVIEW_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn require_text(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required", message));
    }
    Ok(())
}

pub fn validate_task(task: &str) -> Result<(), ValidationError> {
    if task.trim().chars().count() < MIN_TASK_LEN {
        return Err(rule("task_length", "Task must be at least 5 characters"));
    }
    Ok(())
}

/// Blank means "use the default"; anything else must name a known status.
pub fn validate_status(status: &str) -> Result<(), ValidationError> {
    if status.trim().is_empty() || JsaStatus::parse(status).is_some() {
        return Ok(());
    }
    Err(rule(
        "status",
        "Status must be one of Draft, Active, Reviewed, Obsolete",
    ))
}

/// Blank is treated as absent. Otherwise exactly `YYYY-MM-DD` and a real date.
pub fn validate_review_date(date: &str) -> Result<(), ValidationError> {
    let date = date.trim();
    if date.is_empty() {
        return Ok(());
    }
    if !REVIEW_DATE_RE.is_match(date) || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(rule(
            "review_date",
            "Review date must be a valid date in YYYY-MM-DD format",
        ));
    }
    Ok(())
}

pub fn validate_step_description(value: &str) -> Result<(), ValidationError> {
    require_text(value, "Step description is required")
}

pub fn validate_step_hazards(value: &str) -> Result<(), ValidationError> {
    require_text(value, "Hazards are required")
}

pub fn validate_step_controls(value: &str) -> Result<(), ValidationError> {
    require_text(value, "Controls are required")
}

/// Names of locations and employees.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    require_text(value, "Name is required")
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let name = camel_case(&field.to_string());
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}.{}", prefix, name)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// Flatten `validator` output into field-path/message pairs, sorted by path.
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect("", errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn normalize_step(step: &StepInput) -> NewJsaStep {
    NewJsaStep {
        description: step.description.trim().to_string(),
        hazards: step.hazards.trim().to_string(),
        controls: step.controls.trim().to_string(),
        risk_level_before: non_blank(step.risk_level_before.as_ref()),
        risk_level_after: non_blank(step.risk_level_after.as_ref()),
    }
}

/// Validate a raw submission and normalize it for persistence.
///
/// Pure: no I/O, no attachment handling. `attachment_path` is left unset.
pub fn validate_submission(input: &JsaInput) -> Result<ValidatedJsa, Vec<FieldError>> {
    if let Err(errors) = input.validate() {
        return Err(flatten_errors(&errors));
    }

    let status = non_blank(input.status.as_ref())
        .and_then(|s| JsaStatus::parse(&s))
        .unwrap_or_default();

    let review_date = non_blank(input.review_date.as_ref())
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

    let record = NewJsa {
        task: input.task.trim().to_string(),
        location_id: input.location_id,
        department: non_blank(input.department.as_ref()),
        responsible_person_id: input.responsible_person_id,
        team_members: non_blank(input.team_members.as_ref()),
        required_ppe: non_blank(input.required_ppe.as_ref()),
        status,
        review_date,
        attachment_path: None,
    };

    Ok(ValidatedJsa {
        record,
        steps: input.steps.iter().map(normalize_step).collect(),
    })
}
