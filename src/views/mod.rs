//! Server-rendered pages
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Catalog text is escaped once when a form is accepted, so anything read
//! back from the store goes through [`stored`] instead of being escaped a
//! second time. Everything else (messages, counts, dates) is interpolated
//! normally.

pub mod author;
pub mod book;
pub mod book_instance;
pub mod error;
pub mod genre;
pub mod index;

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::validation::FieldError;

const NAV_LINKS: &[(&str, &str)] = &[
    ("/catalog", "Home"),
    ("/catalog/books", "All books"),
    ("/catalog/authors", "All authors"),
    ("/catalog/genres", "All genres"),
    ("/catalog/bookinstances", "All book-instances"),
];

const CREATE_LINKS: &[(&str, &str)] = &[
    ("/catalog/author/create", "Create new author"),
    ("/catalog/genre/create", "Create new genre"),
    ("/catalog/book/create", "Create new book"),
    ("/catalog/bookinstance/create", "Create new book instance (copy)"),
];

/// Text that was escaped on the way into the store
pub fn stored(text: &str) -> PreEscaped<&str> {
    PreEscaped(text)
}

/// Renders the page shell: head, sidebar navigation and content column
pub fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/stylesheets/style.css";
            }
            body {
                div.container {
                    nav.sidebar {
                        ul.sidebar-nav {
                            @for (href, label) in NAV_LINKS {
                                li { a href=(href) { (label) } }
                            }
                            li { hr; }
                            @for (href, label) in CREATE_LINKS {
                                li { a href=(href) { (label) } }
                            }
                        }
                    }
                    main.content {
                        (content)
                    }
                }
            }
        }
    }
}

/// Renders the error list shown above a re-rendered form
pub fn form_errors(errors: &[FieldError]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul.errors {
                @for error in errors {
                    li.text-danger data-field=(error.field) { (error.message) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_includes_doctype_and_nav() {
        let page = layout("Test", html! { p { "body" } }).into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Test</title>"));
        assert!(page.contains("href=\"/catalog/books\""));
        assert!(page.contains("Create new book instance (copy)"));
    }

    #[test]
    fn stored_text_is_not_escaped_twice() {
        let page = html! { p { (stored("Tom &amp; Jerry")) } }.into_string();
        assert_eq!(page, "<p>Tom &amp; Jerry</p>");
    }

    #[test]
    fn form_errors_empty_renders_nothing() {
        assert_eq!(form_errors(&[]).into_string(), "");
        let rendered = form_errors(&[FieldError::new("title", "Title must not be empty.")])
            .into_string();
        assert!(rendered.contains("Title must not be empty."));
        assert!(rendered.contains("data-field=\"title\""));
    }
}
