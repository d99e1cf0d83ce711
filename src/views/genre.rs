//! Genre pages

use maud::{html, Markup};

use super::{form_errors, layout, stored};
use crate::{
    models::{Book, Genre, GenreDetail, NewGenre},
    validation::FieldError,
};

pub fn list(genres: &[Genre]) -> Markup {
    layout(
        "Genre List",
        html! {
            h1 { "Genre List" }
            @if genres.is_empty() {
                p { "There are no genres." }
            } @else {
                ul {
                    @for genre in genres {
                        li { a href=(genre.url()) { (stored(&genre.name)) } }
                    }
                }
            }
        },
    )
}

pub fn detail(detail: &GenreDetail) -> Markup {
    let genre = &detail.genre;
    layout(
        "Genre Detail",
        html! {
            h1 { "Genre: " (stored(&genre.name)) }
            div {
                h4 { "Books" }
                (book_summaries(&detail.books))
            }
            hr;
            p { a href={ (genre.url()) "/delete" } { "Delete genre" } }
            p { a href={ (genre.url()) "/update" } { "Update genre" } }
        },
    )
}

pub fn form(title: &str, genre: &NewGenre, errors: &[FieldError]) -> Markup {
    layout(
        title,
        html! {
            h1 { (title) }
            form method="POST" {
                div.form-group {
                    label for="name" { "Genre:" }
                    input id="name" type="text" name="name" placeholder="Fantasy, Poetry etc."
                        required value=(stored(&genre.name));
                }
                button.btn type="submit" { "Submit" }
            }
            (form_errors(errors))
        },
    )
}

pub fn delete(detail: &GenreDetail) -> Markup {
    layout(
        "Delete Genre",
        html! {
            h1 { "Delete Genre: " (stored(&detail.genre.name)) }
            @if !detail.books.is_empty() {
                p { strong { "Delete the following books before attempting to delete this genre." } }
                div {
                    h4 { "Books" }
                    (book_summaries(&detail.books))
                }
            } @else {
                p { "Do you really want to delete this Genre?" }
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
            p { "This genre has no books." }
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
    use uuid::Uuid;

    #[test]
    fn empty_genre_offers_delete_form() {
        let detail = GenreDetail {
            genre: Genre {
                id: Uuid::new_v4(),
                name: "Poetry".into(),
            },
            books: vec![],
        };
        let page = delete(&detail).into_string();
        assert!(page.contains("Do you really want to delete this Genre?"));
        assert!(page.contains("<form method=\"POST\">"));
    }
}
