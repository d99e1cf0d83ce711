//! Book instance (copy) endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use chrono::Local;
use maud::Markup;

use super::parse_id;
use crate::{
    error::{AppError, AppResult},
    models::{BookInstanceDraft, BookInstanceForm},
    validation::FieldError,
    views, AppState,
};

const LIST_URL: &str = "/catalog/bookinstances";

pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let instances = state.services.catalog.book_instance_list().await?;
    Ok(views::book_instance::list(&instances))
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Markup> {
    let id = parse_id(&id, "Book instance")?;
    let detail = state.services.catalog.book_instance_detail(id).await?;
    Ok(views::book_instance::detail(&detail))
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Markup> {
    render_form(
        &state,
        "Create BookInstance",
        &BookInstanceDraft::default(),
        &[],
    )
    .await
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let submission = form.into_submission();
    let today = Local::now().date_naive();

    match submission.value.complete(today).filter(|_| submission.is_valid()) {
        Some(copy) => {
            let copy = state.services.catalog.create_book_instance(&copy).await?;
            Ok(Redirect::to(&copy.url()).into_response())
        }
        None => render_form(
            &state,
            "Create BookInstance",
            &submission.value,
            &submission.errors,
        )
        .await
        .map(IntoResponse::into_response),
    }
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = parse_id(&id, "Book instance")?;
    let (copy, books) = state.services.catalog.book_instance_for_update(id).await?;
    Ok(views::book_instance::form(
        "Update BookInstance",
        &BookInstanceDraft::from(&copy),
        &books,
        &[],
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book instance")?;
    let submission = form.into_submission();
    let today = Local::now().date_naive();

    match submission.value.complete(today).filter(|_| submission.is_valid()) {
        Some(copy) => {
            let copy = state
                .services
                .catalog
                .update_book_instance(id, &copy)
                .await?;
            Ok(Redirect::to(&copy.url()).into_response())
        }
        None => render_form(
            &state,
            "Update BookInstance",
            &submission.value,
            &submission.errors,
        )
        .await
        .map(IntoResponse::into_response),
    }
}

/// Confirmation page; an unknown copy sends the user back to the list
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book instance")?;
    match state.services.catalog.book_instance_detail(id).await {
        Ok(detail) => Ok(views::book_instance::delete(&detail).into_response()),
        Err(AppError::NotFound(_)) => Ok(Redirect::to(LIST_URL).into_response()),
        Err(e) => Err(e),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_id(&id, "Book instance")?;
    state.services.catalog.delete_book_instance(id).await?;
    Ok(Redirect::to(LIST_URL))
}

async fn render_form(
    state: &AppState,
    title: &str,
    copy: &BookInstanceDraft,
    errors: &[FieldError],
) -> AppResult<Markup> {
    let books = state.services.catalog.book_choices().await?;
    Ok(views::book_instance::form(title, copy, &books, errors))
}
