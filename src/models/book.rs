//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{Author, BookInstance, Genre};
use crate::validation::{
    collect_errors, escape, parse_reference, rule_error, trim_in_place, validate_reference,
    FieldError, Submission,
};

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Author reference
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    /// Genre references, in the order they were submitted
    #[sqlx(skip)]
    #[serde(default)]
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

/// Title + author projection used by list pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
}

impl BookSummary {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author,
        }
    }
}

fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

/// Create/update book data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

/// Book as entered in the form: sanitized values, references that could
/// not be parsed are left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: Option<Uuid>,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl BookDraft {
    /// The insertable book, once an author is known
    pub fn complete(&self) -> Option<NewBook> {
        Some(NewBook {
            title: self.title.clone(),
            author: self.author?,
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            genre: self.genre.clone(),
        })
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: Some(book.author),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.clone(),
        }
    }
}

/// Book list row with its author resolved
#[derive(Debug, Clone)]
pub struct BookListEntry {
    pub book: BookSummary,
    pub author: Option<Author>,
}

/// Book with author, genres and copies resolved
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

/// Raw book form submission.
///
/// `genre` may be absent, given once, or repeated; the form extractor
/// collects all occurrences in order.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "validate_author")
    )]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl BookForm {
    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn"];

    /// Trim, validate and escape the submission
    pub fn into_submission(mut self) -> Submission<BookDraft> {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.author);
        trim_in_place(&mut self.summary);
        trim_in_place(&mut self.isbn);

        let mut errors = collect_errors(self.validate(), Self::FIELDS);

        let mut genre = Vec::with_capacity(self.genre.len());
        let mut bad_genre = false;
        for raw in &self.genre {
            match parse_reference(raw.trim()) {
                Ok(Some(id)) if !genre.contains(&id) => genre.push(id),
                Ok(_) => {}
                Err(_) => bad_genre = true,
            }
        }
        if bad_genre {
            errors.push(FieldError::new("genre", "Genre selection is invalid."));
        }

        let value = BookDraft {
            title: escape(&self.title),
            author: parse_reference(&self.author).ok().flatten(),
            summary: escape(&self.summary),
            isbn: escape(&self.isbn),
            genre,
        };
        Submission { value, errors }
    }
}

fn validate_author(value: &str) -> Result<(), ValidationError> {
    validate_reference(value)
        .map_err(|_| rule_error("reference", "Author must be selected from the list."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, author: &str, summary: &str, isbn: &str, genre: Vec<String>) -> BookForm {
        BookForm {
            title: title.into(),
            author: author.into(),
            summary: summary.into(),
            isbn: isbn.into(),
            genre,
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed_and_escaped() {
        let author = Uuid::new_v4();
        let genre = Uuid::new_v4();
        let submission = form(
            "  Dune ",
            &author.to_string(),
            "desert <planet>",
            "9780441013593",
            vec![genre.to_string()],
        )
        .into_submission();

        assert!(submission.is_valid());
        let book = submission.value.complete().unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, author);
        assert_eq!(book.summary, "desert &lt;planet&gt;");
        assert_eq!(book.isbn, "9780441013593");
        assert_eq!(book.genre, vec![genre]);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let submission = form(" ", "", "", "", vec![]).into_submission();
        let messages: Vec<_> = submission.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Title must not be empty.",
                "Author must not be empty.",
                "Summary must not be empty.",
                "ISBN must not be empty.",
            ]
        );
        assert!(submission.value.complete().is_none());
    }

    #[test]
    fn test_unknown_author_reference() {
        let submission = form("Dune", "frank", "s", "i", vec![]).into_submission();
        assert_eq!(submission.errors.len(), 1);
        assert_eq!(submission.errors[0].field, "author");
        assert_eq!(
            submission.errors[0].message,
            "Author must be selected from the list."
        );
    }

    #[test]
    fn test_genre_order_preserved_and_duplicates_dropped() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let submission = form(
            "Dune",
            &Uuid::new_v4().to_string(),
            "s",
            "i",
            vec![b.to_string(), a.to_string(), b.to_string()],
        )
        .into_submission();
        assert!(submission.is_valid());
        assert_eq!(submission.value.genre, vec![b, a]);
    }

    #[test]
    fn test_invalid_genre_value() {
        let submission = form(
            "Dune",
            &Uuid::new_v4().to_string(),
            "s",
            "i",
            vec!["scifi".to_string()],
        )
        .into_submission();
        assert_eq!(
            submission.errors,
            vec![FieldError::new("genre", "Genre selection is invalid.")]
        );
    }

    #[test]
    fn test_url() {
        let book = Book {
            id: Uuid::new_v4(),
            title: "Dune".into(),
            author: Uuid::new_v4(),
            summary: "s".into(),
            isbn: "i".into(),
            genre: vec![],
        };
        assert_eq!(book.url(), format!("/catalog/book/{}", book.id));
        assert_eq!(BookSummary::from(&book).url(), book.url());
    }
}
