//! Book instance (copy) pages

use maud::{html, Markup};

use super::{form_errors, layout, stored};
use crate::{
    models::{
        format_input_date, BookInstance, BookInstanceDetail, BookInstanceDraft,
        BookInstanceListEntry, BookInstanceStatus, BookSummary,
    },
    validation::FieldError,
};

pub fn list(instances: &[BookInstanceListEntry]) -> Markup {
    layout(
        "Book Instance List",
        html! {
            h1 { "Book Instance List" }
            @if instances.is_empty() {
                p { "There are no book copies in this library." }
            } @else {
                ul {
                    @for entry in instances {
                        @let copy = &entry.instance;
                        li {
                            a href=(copy.url()) {
                                @if let Some(book) = &entry.book {
                                    (stored(&book.title)) " : "
                                }
                                (stored(&copy.imprint))
                            }
                            " - "
                            span class=(copy.status.css_class()) { (copy.status.as_str()) }
                            @if copy.status != BookInstanceStatus::Available {
                                span { " (Due: " (copy.due_back_formatted()) ")" }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail(detail: &BookInstanceDetail) -> Markup {
    let copy = &detail.instance;
    layout(
        "Book Instance Detail",
        html! {
            h1 { "ID: " (copy.id.to_string()) }
            (summary(detail))
            hr;
            p { a href={ (copy.url()) "/delete" } { "Delete BookInstance" } }
            p { a href={ (copy.url()) "/update" } { "Update BookInstance" } }
        },
    )
}

pub fn form(
    title: &str,
    copy: &BookInstanceDraft,
    books: &[BookSummary],
    errors: &[FieldError],
) -> Markup {
    let due_back = copy.due_back.map(format_input_date);
    layout(
        title,
        html! {
            h1 { (title) }
            form method="POST" {
                div.form-group {
                    label for="book" { "Book:" }
                    select id="book" name="book" required {
                        option value="" { "--Please select a book--" }
                        @for book in books {
                            option value=(book.id.to_string()) selected[copy.book == Some(book.id)] {
                                (stored(&book.title))
                            }
                        }
                    }
                }
                div.form-group {
                    label for="imprint" { "Imprint:" }
                    input id="imprint" type="text" name="imprint"
                        placeholder="Publisher and date information"
                        required value=(stored(&copy.imprint));
                }
                div.form-group {
                    label for="due_back" { "Date when book available:" }
                    input id="due_back" type="date" name="due_back" value=[due_back];
                }
                div.form-group {
                    label for="status" { "Status:" }
                    select id="status" name="status" required {
                        option value="" { "--Please select a status--" }
                        @for status in BookInstanceStatus::ALL {
                            option value=(status.as_str()) selected[copy.status == status] {
                                (status.as_str())
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

pub fn delete(detail: &BookInstanceDetail) -> Markup {
    layout(
        "Delete BookInstance",
        html! {
            h1 { "Delete BookInstance" }
            p { "Do you really want to delete this BookInstance?" }
            (summary(detail))
            form method="POST" {
                button.btn type="submit" { "Delete" }
            }
        },
    )
}

fn summary(detail: &BookInstanceDetail) -> Markup {
    let copy: &BookInstance = &detail.instance;
    html! {
        p {
            strong { "Title: " }
            @if let Some(book) = &detail.book {
                a href=(book.url()) { (stored(&book.title)) }
            }
        }
        p { strong { "Imprint: " } (stored(&copy.imprint)) }
        p {
            strong { "Status: " }
            span class=(copy.status.css_class()) { (copy.status.as_str()) }
        }
        @if copy.status != BookInstanceStatus::Available {
            p { strong { "Due back: " } (copy.due_back_formatted()) }
        }
    }
}
