//! Author endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::Markup;

use super::parse_id;
use crate::{
    error::AppResult,
    models::{AuthorForm, NewAuthor},
    services::catalog::DeleteOutcome,
    views, AppState,
};

const LIST_URL: &str = "/catalog/authors";

pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let authors = state.services.catalog.author_list().await?;
    Ok(views::author::list(&authors))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Markup> {
    let id = parse_id(&id, "Author")?;
    let detail = state.services.catalog.author_detail(id).await?;
    Ok(views::author::detail(&detail))
}

pub async fn create_form() -> Markup {
    views::author::form("Create Author", &NewAuthor::default(), &[])
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let submission = form.into_submission();
    if !submission.is_valid() {
        return Ok(
            views::author::form("Create Author", &submission.value, &submission.errors)
                .into_response(),
        );
    }

    let author = state.services.catalog.create_author(&submission.value).await?;
    Ok(Redirect::to(&author.url()).into_response())
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = parse_id(&id, "Author")?;
    let author = state.services.catalog.find_author(id).await?;
    Ok(views::author::form(
        "Update Author",
        &NewAuthor::from(&author),
        &[],
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Author")?;
    let submission = form.into_submission();
    if !submission.is_valid() {
        return Ok(
            views::author::form("Update Author", &submission.value, &submission.errors)
                .into_response(),
        );
    }

    let author = state
        .services
        .catalog
        .update_author(id, &submission.value)
        .await?;
    Ok(Redirect::to(&author.url()).into_response())
}

/// Confirmation page; an unknown author sends the user back to the list
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Author")?;
    match state.services.catalog.find_author_detail(id).await? {
        Some(detail) => Ok(views::author::delete(&detail).into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Author")?;
    match state.services.catalog.delete_author(id).await? {
        DeleteOutcome::Deleted => Ok(Redirect::to(LIST_URL).into_response()),
        DeleteOutcome::Blocked(detail) => Ok(views::author::delete(&detail).into_response()),
    }
}
