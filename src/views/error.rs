//! Error page

use axum::http::StatusCode;
use maud::{html, Markup};

use super::layout;

pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let reason = status.canonical_reason().unwrap_or("Error");
    layout(
        reason,
        html! {
            h1 { (reason) }
            h2 { (status.as_u16()) }
            p { (message) }
        },
    )
}
