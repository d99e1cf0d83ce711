//! Form sanitization and error collection.
//!
//! Submitted text goes through three steps: trim, validate (the `validator`
//! derives on each form type), escape. Errors are gathered for every field
//! before the controller decides what to do, and are reported in the order
//! the form declares its fields so the re-rendered page lists them
//! top to bottom.

use std::borrow::Cow;

use chrono::NaiveDate;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

/// A single field-level error shown next to a re-rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A sanitized candidate entity together with every error found while
/// checking it.
#[derive(Debug, Clone)]
pub struct Submission<T> {
    pub value: T,
    pub errors: Vec<FieldError>,
}

impl<T> Submission<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Escape the characters that are significant in HTML markup.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trim surrounding whitespace in place.
pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Turn `validator` output into an error list ordered by `order`, the
/// form's declared field order.
pub fn collect_errors(
    result: Result<(), ValidationErrors>,
    order: &[&'static str],
) -> Vec<FieldError> {
    let errors = match result {
        Ok(()) => return Vec::new(),
        Err(errors) => errors,
    };
    let by_field = errors.field_errors();

    let mut collected = Vec::new();
    for field in order {
        if let Some(list) = by_field.get(*field) {
            for error in list.iter() {
                collected.push(FieldError::new(*field, message_for(field, error)));
            }
        }
    }
    collected
}

fn message_for(field: &str, error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value for {}.", field),
    }
}

/// Build a `ValidationError` carrying a display message.
pub fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Parse an optional `YYYY-MM-DD` date. Empty input means "not supplied".
pub fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map(Some)
}

/// Parse a reference field. Empty input means "not supplied".
pub fn parse_reference(value: &str) -> Result<Option<Uuid>, uuid::Error> {
    if value.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(value).map(Some)
}

/// Validator for optional ISO-8601 date fields.
pub fn validate_optional_date(value: &str) -> Result<(), ValidationError> {
    parse_optional_date(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("iso8601"))
}

/// Validator for reference fields. Emptiness is checked separately.
pub fn validate_reference(value: &str) -> Result<(), ValidationError> {
    parse_reference(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("reference"))
}

/// Validator for names: letters and digits only (empty passes; length rules
/// report that case).
pub fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;&#x2F;b&gt;"
        );
    }

    #[test]
    fn test_trim_in_place() {
        let mut value = "  Dune \n".to_string();
        trim_in_place(&mut value);
        assert_eq!(value, "Dune");

        let mut untouched = "Dune".to_string();
        trim_in_place(&mut untouched);
        assert_eq!(untouched, "Dune");
    }

    #[test]
    fn test_collect_errors_follows_declared_order() {
        let mut errors = ValidationErrors::new();
        errors.add("isbn", rule_error("length", "ISBN must not be empty."));
        errors.add("title", rule_error("length", "Title must not be empty."));

        let collected = collect_errors(Err(errors), &["title", "author", "isbn"]);
        assert_eq!(
            collected,
            vec![
                FieldError::new("title", "Title must not be empty."),
                FieldError::new("isbn", "ISBN must not be empty."),
            ]
        );
    }

    #[test]
    fn test_collect_errors_ok() {
        assert!(collect_errors(Ok(()), &["title"]).is_empty());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date("").unwrap(), None);
        assert_eq!(
            parse_optional_date("1920-01-02").unwrap(),
            NaiveDate::from_ymd_opt(1920, 1, 2)
        );
        assert!(parse_optional_date("02/01/1920").is_err());
    }

    #[test]
    fn test_validate_alphanumeric() {
        assert!(validate_alphanumeric("Asimov").is_ok());
        assert!(validate_alphanumeric("").is_ok());
        assert!(validate_alphanumeric("Le Guin").is_err());
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("").is_ok());
        assert!(validate_reference(&Uuid::new_v4().to_string()).is_ok());
        assert!(validate_reference("scifi").is_err());
    }
}
