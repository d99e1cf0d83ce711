//! Home page endpoint

use axum::extract::State;
use maud::Markup;

use crate::{views, AppState};

/// Record counts; a failed count is shown in place and never fails the page
pub async fn index(State(state): State<AppState>) -> Markup {
    let counts = state.services.catalog.counts().await;
    views::index::index(&counts)
}
