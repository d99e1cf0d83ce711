//! Home page

use maud::{html, Markup};

use super::layout;
use crate::services::catalog::{CatalogCounts, Count};

pub fn index(counts: &CatalogCounts) -> Markup {
    layout(
        "Local Library Home",
        html! {
            h1 { "Local Library Home" }
            p {
                "Welcome to " em { "LocalLibrary" }
                ", a very basic website developed as a tutorial example."
            }
            h2 { "Dynamic content" }
            p { "The library has the following record counts:" }
            ul {
                (count_item("Books", &counts.book_count))
                (count_item("Copies", &counts.book_instance_count))
                (count_item("Copies available", &counts.book_instance_available_count))
                (count_item("Authors", &counts.author_count))
                (count_item("Genres", &counts.genre_count))
            }
        },
    )
}

fn count_item(label: &str, count: &Count) -> Markup {
    html! {
        li {
            strong { (label) ": " }
            @match count {
                Ok(n) => { (n) }
                Err(_) => { span.text-danger { "error" } }
            }
        }
    }
}
