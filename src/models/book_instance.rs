//! Book instance (physical copy) model

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{format_date, BookSummary};
use crate::validation::{
    collect_errors, escape, parse_optional_date, parse_reference, rule_error, trim_in_place,
    validate_optional_date, validate_reference, Submission,
};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Available,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }

    /// Stylesheet class used on list and detail pages
    pub fn css_class(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "text-success",
            BookInstanceStatus::Maintenance => "text-danger",
            BookInstanceStatus::Loaned | BookInstanceStatus::Reserved => "text-warning",
        }
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown book instance status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for BookInstanceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookInstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A physical copy of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: Uuid,
    /// Book reference
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: NaiveDate,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        format_date(self.due_back)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookInstance {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: NaiveDate,
}

/// Copy as entered in the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInstanceDraft {
    pub book: Option<Uuid>,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstanceDraft {
    /// The insertable copy; a missing due date becomes `today`
    pub fn complete(&self, today: NaiveDate) -> Option<NewBookInstance> {
        Some(NewBookInstance {
            book: self.book?,
            imprint: self.imprint.clone(),
            status: self.status,
            due_back: self.due_back.unwrap_or(today),
        })
    }
}

impl From<&BookInstance> for BookInstanceDraft {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: Some(instance.book),
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: Some(instance.due_back),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookInstanceListEntry {
    pub instance: BookInstance,
    pub book: Option<BookSummary>,
}

#[derive(Debug, Clone)]
pub struct BookInstanceDetail {
    pub instance: BookInstance,
    pub book: Option<BookSummary>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookInstanceForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Book must be specified."),
        custom(function = "validate_book")
    )]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Imprint must be specified."))]
    pub imprint: String,
    #[serde(default)]
    #[validate(custom(function = "validate_status"))]
    pub status: String,
    #[serde(default)]
    #[validate(custom(function = "validate_due_back"))]
    pub due_back: String,
}

impl BookInstanceForm {
    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    pub fn into_submission(mut self) -> Submission<BookInstanceDraft> {
        trim_in_place(&mut self.book);
        trim_in_place(&mut self.imprint);
        trim_in_place(&mut self.status);
        trim_in_place(&mut self.due_back);

        let errors = collect_errors(self.validate(), Self::FIELDS);
        let value = BookInstanceDraft {
            book: parse_reference(&self.book).ok().flatten(),
            imprint: escape(&self.imprint),
            status: parse_status(&self.status).unwrap_or_default(),
            due_back: parse_optional_date(&self.due_back).ok().flatten(),
        };
        Submission { value, errors }
    }
}

/// Empty status means the default
fn parse_status(value: &str) -> Result<BookInstanceStatus, ParseStatusError> {
    if value.is_empty() {
        return Ok(BookInstanceStatus::default());
    }
    value.parse()
}

fn validate_book(value: &str) -> Result<(), ValidationError> {
    validate_reference(value)
        .map_err(|_| rule_error("reference", "Book must be selected from the list."))
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    parse_status(value)
        .map(|_| ())
        .map_err(|_| rule_error("status", "Invalid status."))
}

fn validate_due_back(value: &str) -> Result<(), ValidationError> {
    validate_optional_date(value).map_err(|_| rule_error("iso8601", "Invalid date."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_text() {
        for status in BookInstanceStatus::ALL {
            assert_eq!(status.as_str().parse::<BookInstanceStatus>(), Ok(status));
        }
        assert!("Lost".parse::<BookInstanceStatus>().is_err());
        assert_eq!(BookInstanceStatus::default(), BookInstanceStatus::Maintenance);
    }

    #[test]
    fn test_submission_defaults() {
        let book = Uuid::new_v4();
        let submission = BookInstanceForm {
            book: book.to_string(),
            imprint: " Ace, 1990 ".into(),
            status: "".into(),
            due_back: "".into(),
        }
        .into_submission();
        assert!(submission.is_valid());

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let instance = submission.value.complete(today).unwrap();
        assert_eq!(instance.book, book);
        assert_eq!(instance.imprint, "Ace, 1990");
        assert_eq!(instance.status, BookInstanceStatus::Maintenance);
        assert_eq!(instance.due_back, today);
    }

    #[test]
    fn test_submission_errors() {
        let submission = BookInstanceForm {
            book: "".into(),
            imprint: "".into(),
            status: "Lost".into(),
            due_back: "soon".into(),
        }
        .into_submission();
        let messages: Vec<_> = submission.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Book must be specified.",
                "Imprint must be specified.",
                "Invalid status.",
                "Invalid date.",
            ]
        );
    }

    #[test]
    fn test_url_and_due_back() {
        let instance = BookInstance {
            id: Uuid::new_v4(),
            book: Uuid::new_v4(),
            imprint: "Ace".into(),
            status: BookInstanceStatus::Loaned,
            due_back: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        };
        assert_eq!(instance.url(), format!("/catalog/bookinstance/{}", instance.id));
        assert_eq!(instance.due_back_formatted(), "Nov 1, 2026");
        assert_eq!(instance.status.css_class(), "text-warning");
    }
}
