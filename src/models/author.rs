//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{format_date, Book};
use crate::validation::{
    collect_errors, escape, parse_optional_date, rule_error, trim_in_place,
    validate_alphanumeric, validate_optional_date, Submission,
};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// `"Family, First"`, or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// `"Jan 2, 1920 - Apr 6, 1992"`; unknown dates are left blank
    pub fn lifespan(&self) -> String {
        let birth = self.date_of_birth.map(format_date).unwrap_or_default();
        let death = self.date_of_death.map(format_date).unwrap_or_default();
        format!("{} - {}", birth, death)
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

/// Create/update author data (sanitized)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl From<&Author> for NewAuthor {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        }
    }
}

/// Author together with the books they wrote
#[derive(Debug, Clone)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

/// Raw author form submission
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "First name must be specified."),
        custom(function = "validate_first_name")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        custom(function = "validate_family_name")
    )]
    pub family_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: String,
    #[serde(default)]
    #[validate(custom(function = "validate_date_of_death"))]
    pub date_of_death: String,
}

impl AuthorForm {
    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    /// Trim, validate and escape the submission
    pub fn into_submission(mut self) -> Submission<NewAuthor> {
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.family_name);
        trim_in_place(&mut self.date_of_birth);
        trim_in_place(&mut self.date_of_death);

        let errors = collect_errors(self.validate(), Self::FIELDS);
        let value = NewAuthor {
            first_name: escape(&self.first_name),
            family_name: escape(&self.family_name),
            date_of_birth: parse_optional_date(&self.date_of_birth).ok().flatten(),
            date_of_death: parse_optional_date(&self.date_of_death).ok().flatten(),
        };
        Submission { value, errors }
    }
}

fn validate_name(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.chars().count() > 100 {
        return Err(rule_error("length", "Names are limited to 100 characters."));
    }
    validate_alphanumeric(value).map_err(|_| rule_error("alphanumeric", message))
}

fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    validate_name(value, "First name has non-alphanumeric characters.")
}

fn validate_family_name(value: &str) -> Result<(), ValidationError> {
    validate_name(value, "Family name has non-alphanumeric characters.")
}

fn validate_date_of_birth(value: &str) -> Result<(), ValidationError> {
    validate_optional_date(value).map_err(|_| rule_error("iso8601", "Invalid date of birth."))
}

fn validate_date_of_death(value: &str) -> Result<(), ValidationError> {
    validate_optional_date(value).map_err(|_| rule_error("iso8601", "Invalid date of death."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, family: &str) -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1920, 1, 2),
            date_of_death: None,
        }
    }

    #[test]
    fn test_name_and_lifespan() {
        let a = author("Isaac", "Asimov");
        assert_eq!(a.name(), "Asimov, Isaac");
        assert_eq!(a.lifespan(), "Jan 2, 1920 - ");
        assert_eq!(a.url(), format!("/catalog/author/{}", a.id));

        assert_eq!(author("", "Asimov").name(), "");
    }

    #[test]
    fn test_valid_submission() {
        let form = AuthorForm {
            first_name: "  Isaac ".into(),
            family_name: "Asimov".into(),
            date_of_birth: "1920-01-02".into(),
            date_of_death: "".into(),
        };
        let submission = form.into_submission();
        assert!(submission.is_valid());
        assert_eq!(submission.value.first_name, "Isaac");
        assert_eq!(submission.value.date_of_birth, NaiveDate::from_ymd_opt(1920, 1, 2));
        assert_eq!(submission.value.date_of_death, None);
    }

    #[test]
    fn test_invalid_submission_collects_every_field() {
        let form = AuthorForm {
            first_name: "".into(),
            family_name: "Le Guin".into(),
            date_of_birth: "yesterday".into(),
            date_of_death: "".into(),
        };
        let submission = form.into_submission();
        let messages: Vec<_> = submission.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "First name must be specified.",
                "Family name has non-alphanumeric characters.",
                "Invalid date of birth.",
            ]
        );
    }
}
