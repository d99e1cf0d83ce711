//! Genre endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::Markup;

use super::parse_id;
use crate::{
    error::AppResult,
    models::{GenreForm, NewGenre},
    services::catalog::{DeleteOutcome, GenreCreated},
    views, AppState,
};

const LIST_URL: &str = "/catalog/genres";

pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let genres = state.services.catalog.genre_list().await?;
    Ok(views::genre::list(&genres))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Markup> {
    let id = parse_id(&id, "Genre")?;
    let detail = state.services.catalog.genre_detail(id).await?;
    Ok(views::genre::detail(&detail))
}

pub async fn create_form() -> Markup {
    views::genre::form("Create Genre", &NewGenre::default(), &[])
}

/// Insert a genre; a name already in the catalog redirects to that genre
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let submission = form.into_submission();
    if !submission.is_valid() {
        return Ok(
            views::genre::form("Create Genre", &submission.value, &submission.errors)
                .into_response(),
        );
    }

    let created = state.services.catalog.create_genre(&submission.value).await?;
    if let GenreCreated::Existing(genre) = &created {
        tracing::debug!("Genre {:?} already exists as {}", genre.name, genre.id);
    }
    Ok(Redirect::to(&created.genre().url()).into_response())
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = parse_id(&id, "Genre")?;
    let genre = state.services.catalog.find_genre(id).await?;
    Ok(views::genre::form(
        "Update Genre",
        &NewGenre { name: genre.name },
        &[],
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Genre")?;
    let submission = form.into_submission();
    if !submission.is_valid() {
        return Ok(
            views::genre::form("Update Genre", &submission.value, &submission.errors)
                .into_response(),
        );
    }

    let genre = state
        .services
        .catalog
        .update_genre(id, &submission.value)
        .await?;
    Ok(Redirect::to(&genre.url()).into_response())
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Genre")?;
    match state.services.catalog.find_genre_detail(id).await? {
        Some(detail) => Ok(views::genre::delete(&detail).into_response()),
        None => Ok(Redirect::to(LIST_URL).into_response()),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Genre")?;
    match state.services.catalog.delete_genre(id).await? {
        DeleteOutcome::Deleted => Ok(Redirect::to(LIST_URL).into_response()),
        DeleteOutcome::Blocked(detail) => Ok(views::genre::delete(&detail).into_response()),
    }
}
