//! Book endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::Markup;

use super::parse_id;
use crate::{
    error::AppResult,
    models::{genre::mark_checked, BookDraft, BookForm},
    validation::FieldError,
    views, AppState,
};

/// All books, sorted by title
pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let books = state.services.catalog.book_list().await?;
    Ok(views::book::list(&books))
}

/// Book with author, genres and copies
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Markup> {
    let id = parse_id(&id, "Book")?;
    let detail = state.services.catalog.book_detail(id).await?;
    Ok(views::book::detail(&detail))
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Markup> {
    render_form(&state, "Create Book", &BookDraft::default(), &[]).await
}

/// Validate and insert a book, or re-render the form with every error
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let submission = form.into_submission();

    match submission.value.complete().filter(|_| submission.is_valid()) {
        Some(book) => {
            let book = state.services.catalog.create_book(&book).await?;
            Ok(Redirect::to(&book.url()).into_response())
        }
        None => {
            render_form(&state, "Create Book", &submission.value, &submission.errors)
                .await
                .map(IntoResponse::into_response)
        }
    }
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = parse_id(&id, "Book")?;
    let (book, options) = state.services.catalog.book_for_update(id).await?;
    let genres = mark_checked(options.genres, &book.genre);
    Ok(views::book::form(
        "Update Book",
        &BookDraft::from(&book),
        &options.authors,
        &genres,
        &[],
    ))
}

/// Validate and replace a book, keeping its identifier
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = parse_id(&id, "Book")?;
    let submission = form.into_submission();

    match submission.value.complete().filter(|_| submission.is_valid()) {
        Some(book) => {
            let book = state.services.catalog.update_book(id, &book).await?;
            Ok(Redirect::to(&book.url()).into_response())
        }
        None => {
            render_form(&state, "Update Book", &submission.value, &submission.errors)
                .await
                .map(IntoResponse::into_response)
        }
    }
}

pub async fn delete_form() -> &'static str {
    "NOT IMPLEMENTED: Book delete GET"
}

pub async fn delete() -> &'static str {
    "NOT IMPLEMENTED: Book delete POST"
}

async fn render_form(
    state: &AppState,
    title: &str,
    book: &BookDraft,
    errors: &[FieldError],
) -> AppResult<Markup> {
    let options = state.services.catalog.book_form_options().await?;
    let genres = mark_checked(options.genres, &book.genre);
    Ok(views::book::form(
        title,
        book,
        &options.authors,
        &genres,
        errors,
    ))
}
