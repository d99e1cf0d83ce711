//! Data models for the Local Library catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use chrono::NaiveDate;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorForm, NewAuthor};
pub use book::{Book, BookDetail, BookDraft, BookForm, BookListEntry, BookSummary, NewBook};
pub use book_instance::{
    BookInstance, BookInstanceDetail, BookInstanceDraft, BookInstanceForm, BookInstanceListEntry,
    BookInstanceStatus, NewBookInstance,
};
pub use genre::{Genre, GenreDetail, GenreForm, GenreOption, NewGenre};

/// Human readable date, e.g. `Oct 19, 2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Date as expected by `<input type="date">`
pub fn format_input_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        assert_eq!(format_date(date), "Oct 9, 2026");
        assert_eq!(format_input_date(date), "2026-10-09");
    }
}
