//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Book;
use crate::validation::{collect_errors, escape, trim_in_place, Submission};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    /// Between 3 and 100 characters
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGenre {
    pub name: String,
}

/// Genre together with the books filed under it
#[derive(Debug, Clone)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

/// A genre as offered in the book form's checkbox list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreOption {
    pub genre: Genre,
    pub checked: bool,
}

/// Pair every genre with whether it belongs to `selected`.
pub fn mark_checked(genres: Vec<Genre>, selected: &[Uuid]) -> Vec<GenreOption> {
    genres
        .into_iter()
        .map(|genre| {
            let checked = selected.contains(&genre.id);
            GenreOption { genre, checked }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenreForm {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 100,
        message = "Genre name must contain between 3 and 100 characters."
    ))]
    pub name: String,
}

impl GenreForm {
    const FIELDS: &'static [&'static str] = &["name"];

    pub fn into_submission(mut self) -> Submission<NewGenre> {
        trim_in_place(&mut self.name);
        let errors = collect_errors(self.validate(), Self::FIELDS);
        Submission {
            value: NewGenre {
                name: escape(&self.name),
            },
            errors,
        }
    }
}
