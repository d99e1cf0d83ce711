//! Author pages

use maud::{html, Markup};

use super::{form_errors, layout, stored};
use crate::{
    models::{format_input_date, Author, AuthorDetail, Book, NewAuthor},
    validation::FieldError,
};

pub fn list(authors: &[Author]) -> Markup {
    layout(
        "Author List",
        html! {
            h1 { "Author List" }
            @if authors.is_empty() {
                p { "There are no authors." }
            } @else {
                ul {
                    @for author in authors {
                        li {
                            a href=(author.url()) { (stored(&author.name())) }
                            " (" (author.lifespan()) ")"
                        }
                    }
                }
            }
        },
    )
}

pub fn detail(detail: &AuthorDetail) -> Markup {
    let author = &detail.author;
    layout(
        "Author Detail",
        html! {
            h1 { "Author: " (stored(&author.name())) }
            p { (author.lifespan()) }
            div {
                h4 { "Books" }
                (book_summaries(&detail.books))
            }
            hr;
            p { a href={ (author.url()) "/delete" } { "Delete author" } }
            p { a href={ (author.url()) "/update" } { "Update author" } }
        },
    )
}

pub fn form(title: &str, author: &NewAuthor, errors: &[FieldError]) -> Markup {
    let birth = author.date_of_birth.map(format_input_date);
    let death = author.date_of_death.map(format_input_date);
    layout(
        title,
        html! {
            h1 { (title) }
            form method="POST" {
                div.form-group {
                    label for="first_name" { "First Name:" }
                    input id="first_name" type="text" name="first_name" placeholder="First name"
                        required value=(stored(&author.first_name));
                    label for="family_name" { "Family Name:" }
                    input id="family_name" type="text" name="family_name" placeholder="Family name"
                        required value=(stored(&author.family_name));
                }
                div.form-group {
                    label for="date_of_birth" { "Date of birth:" }
                    input id="date_of_birth" type="date" name="date_of_birth" value=[birth];
                }
                div.form-group {
                    label for="date_of_death" { "Date of death:" }
                    input id="date_of_death" type="date" name="date_of_death" value=[death];
                }
                button.btn type="submit" { "Submit" }
            }
            (form_errors(errors))
        },
    )
}

/// Delete confirmation, or the list of books blocking the delete
pub fn delete(detail: &AuthorDetail) -> Markup {
    let author = &detail.author;
    layout(
        "Delete Author",
        html! {
            h1 { "Delete Author: " (stored(&author.name())) }
            p { (author.lifespan()) }
            @if !detail.books.is_empty() {
                p { strong { "Delete the following books before attempting to delete this author." } }
                div {
                    h4 { "Books" }
                    (book_summaries(&detail.books))
                }
            } @else {
                p { "Do you really want to delete this Author?" }
                form method="POST" {
                    button.btn type="submit" { "Delete" }
                }
            }
        },
    )
}

fn book_summaries(books: &[Book]) -> Markup {
    html! {
        @if books.is_empty() {
            p { "This author has no books." }
        }
        dl {
            @for book in books {
                dt { a href=(book.url()) { (stored(&book.title)) } }
                dd { (stored(&book.summary)) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn herbert() -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: "Frank".into(),
            family_name: "Herbert".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1920, 10, 8),
            date_of_death: NaiveDate::from_ymd_opt(1986, 2, 11),
        }
    }

    #[test]
    fn delete_page_lists_blocking_books() {
        let author = herbert();
        let detail = AuthorDetail {
            books: vec![Book {
                id: Uuid::new_v4(),
                title: "Dune".into(),
                author: author.id,
                summary: "s".into(),
                isbn: "i".into(),
                genre: vec![],
            }],
            author,
        };
        let page = delete(&detail).into_string();
        assert!(page.contains("Delete the following books"));
        assert!(page.contains("Dune"));
        assert!(!page.contains("<form"));
    }

    #[test]
    fn form_prefills_dates() {
        let author = herbert();
        let page = form("Update Author", &NewAuthor::from(&author), &[]).into_string();
        assert!(page.contains("value=\"1920-10-08\""));
        assert!(page.contains("value=\"Herbert\""));
    }
}
