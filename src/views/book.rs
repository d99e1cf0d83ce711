//! Book pages

use maud::{html, Markup};

use super::{form_errors, layout, stored};
use crate::{
    models::{Author, BookDetail, BookDraft, BookListEntry, GenreOption},
    validation::FieldError,
};

pub fn list(books: &[BookListEntry]) -> Markup {
    layout(
        "Book List",
        html! {
            h1 { "Book List" }
            @if books.is_empty() {
                p { "There are no books." }
            } @else {
                ul {
                    @for entry in books {
                        li {
                            a href=(entry.book.url()) { (stored(&entry.book.title)) }
                            @if let Some(author) = &entry.author {
                                " (" (stored(&author.name())) ")"
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail(detail: &BookDetail) -> Markup {
    let book = &detail.book;
    layout(
        "Book Detail",
        html! {
            h1 { "Title: " (stored(&book.title)) }
            p {
                strong { "Author: " }
                @if let Some(author) = &detail.author {
                    a href=(author.url()) { (stored(&author.name())) }
                }
            }
            p { strong { "Summary: " } (stored(&book.summary)) }
            p { strong { "ISBN: " } (stored(&book.isbn)) }
            p {
                strong { "Genre: " }
                @for (i, genre) in detail.genres.iter().enumerate() {
                    @if i > 0 { ", " }
                    a href=(genre.url()) { (stored(&genre.name)) }
                }
            }
            div.copies {
                h4 { "Copies" }
                @if detail.instances.is_empty() {
                    p { "There are no copies of this book in the library." }
                }
                @for copy in &detail.instances {
                    hr;
                    p class=(copy.status.css_class()) { (copy.status.as_str()) }
                    p { strong { "Imprint: " } (stored(&copy.imprint)) }
                    p { strong { "Due back: " } (copy.due_back_formatted()) }
                    p { strong { "Id: " } a href=(copy.url()) { (copy.id.to_string()) } }
                }
            }
            hr;
            p { a href={ (book.url()) "/delete" } { "Delete Book" } }
            p { a href={ (book.url()) "/update" } { "Update Book" } }
        },
    )
}

/// Create/update form, empty or re-rendered with the submitted values
pub fn form(
    title: &str,
    book: &BookDraft,
    authors: &[Author],
    genres: &[GenreOption],
    errors: &[FieldError],
) -> Markup {
    layout(
        title,
        html! {
            h1 { (title) }
            form method="POST" {
                div.form-group {
                    label for="title" { "Title:" }
                    input id="title" type="text" name="title" placeholder="Name of book"
                        required value=(stored(&book.title));
                }
                div.form-group {
                    label for="author" { "Author:" }
                    select id="author" name="author" required {
                        option value="" { "--Please select an author--" }
                        @for author in authors {
                            option value=(author.id.to_string()) selected[book.author == Some(author.id)] {
                                (stored(&author.name()))
                            }
                        }
                    }
                }
                div.form-group {
                    label for="summary" { "Summary:" }
                    textarea id="summary" name="summary" placeholder="Summary" required {
                        (stored(&book.summary))
                    }
                }
                div.form-group {
                    label for="isbn" { "ISBN:" }
                    input id="isbn" type="text" name="isbn" placeholder="ISBN13"
                        required value=(stored(&book.isbn));
                }
                div.form-group {
                    label { "Genre:" }
                    div {
                        @for option in genres {
                            div.genre-choice {
                                input type="checkbox" name="genre" id=(option.genre.id.to_string())
                                    value=(option.genre.id.to_string()) checked[option.checked];
                                label for=(option.genre.id.to_string()) { (stored(&option.genre.name)) }
                            }
                        }
                    }
                }
                button.btn type="submit" { "Submit" }
            }
            (form_errors(errors))
        },
    )
}
