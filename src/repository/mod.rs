//! Repository layer for database operations
//!
//! Controllers never touch a connection directly: they receive a
//! [`CatalogStore`] handle at startup. [`Repository`] backs it with
//! PostgreSQL, [`memory::MemoryStore`] keeps everything in process.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookInstance, BookInstanceStatus, BookSummary, Genre, NewAuthor, NewBook,
        NewBookInstance, NewGenre,
    },
};

pub use memory::MemoryStore;

/// Data access used by the catalog service.
///
/// Lookups by id return `Ok(None)` when nothing matches; `update_*` return
/// `Ok(None)` when the target does not exist and `delete_*` return whether a
/// row was removed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the backing store answers
    async fn ping(&self) -> AppResult<()>;
    /// Release connections; called once at shutdown
    async fn close(&self);

    async fn count_books(&self) -> AppResult<i64>;
    async fn count_authors(&self) -> AppResult<i64>;
    async fn count_genres(&self) -> AppResult<i64>;
    /// Count copies, optionally only those with the given status
    async fn count_book_instances(&self, status: Option<BookInstanceStatus>) -> AppResult<i64>;

    /// All books, title + author reference, sorted by title
    async fn list_books(&self) -> AppResult<Vec<BookSummary>>;
    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn find_books(&self, ids: &[Uuid]) -> AppResult<Vec<BookSummary>>;
    async fn books_by_author(&self, author: Uuid) -> AppResult<Vec<Book>>;
    async fn books_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>>;
    async fn create_book(&self, book: &NewBook) -> AppResult<Book>;
    async fn update_book(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>>;

    /// All authors sorted by family name
    async fn list_authors(&self) -> AppResult<Vec<Author>>;
    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn find_authors(&self, ids: &[Uuid]) -> AppResult<Vec<Author>>;
    async fn create_author(&self, author: &NewAuthor) -> AppResult<Author>;
    async fn update_author(&self, id: Uuid, author: &NewAuthor) -> AppResult<Option<Author>>;
    async fn delete_author(&self, id: Uuid) -> AppResult<bool>;

    /// All genres sorted by name
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
    async fn find_genre(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    /// Genres with the given ids, in the order of `ids`
    async fn find_genres(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>>;
    async fn create_genre(&self, genre: &NewGenre) -> AppResult<Genre>;
    async fn update_genre(&self, id: Uuid, genre: &NewGenre) -> AppResult<Option<Genre>>;
    async fn delete_genre(&self, id: Uuid) -> AppResult<bool>;

    async fn list_book_instances(&self) -> AppResult<Vec<BookInstance>>;
    async fn find_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn instances_for_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn create_book_instance(&self, instance: &NewBookInstance) -> AppResult<BookInstance>;
    async fn update_book_instance(
        &self,
        id: Uuid,
        instance: &NewBookInstance,
    ) -> AppResult<Option<BookInstance>>;
    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed store holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

pub(crate) const AUTHOR_HAS_BOOKS: &str = "Author still has books";
pub(crate) const GENRE_HAS_BOOKS: &str = "Genre still has books";

/// Map a foreign key violation to a client error carrying `message`;
/// anything else stays a database error.
pub(crate) fn reference_error(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::BadRequest(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Order `rows` to follow `ids`, dropping ids with no row.
pub(crate) fn in_id_order<T>(ids: &[Uuid], mut rows: Vec<T>, id_of: impl Fn(&T) -> Uuid) -> Vec<T> {
    let mut ordered = Vec::with_capacity(rows.len());
    for id in ids {
        if let Some(pos) = rows.iter().position(|row| id_of(row) == *id) {
            ordered.push(rows.swap_remove(pos));
        }
    }
    ordered
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn count_books(&self) -> AppResult<i64> {
        self.books_count().await
    }

    async fn count_authors(&self) -> AppResult<i64> {
        self.authors_count().await
    }

    async fn count_genres(&self) -> AppResult<i64> {
        self.genres_count().await
    }

    async fn count_book_instances(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        self.book_instances_count(status).await
    }

    async fn list_books(&self) -> AppResult<Vec<BookSummary>> {
        self.books_list().await
    }

    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.books_get_by_id(id).await
    }

    async fn find_books(&self, ids: &[Uuid]) -> AppResult<Vec<BookSummary>> {
        self.books_get_by_ids(ids).await
    }

    async fn books_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        self.books_by_author_id(author).await
    }

    async fn books_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        self.books_by_genre_id(genre).await
    }

    async fn create_book(&self, book: &NewBook) -> AppResult<Book> {
        self.books_create(book).await
    }

    async fn update_book(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>> {
        self.books_update(id, book).await
    }

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.authors_list().await
    }

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.authors_get_by_id(id).await
    }

    async fn find_authors(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        self.authors_get_by_ids(ids).await
    }

    async fn create_author(&self, author: &NewAuthor) -> AppResult<Author> {
        self.authors_create(author).await
    }

    async fn update_author(&self, id: Uuid, author: &NewAuthor) -> AppResult<Option<Author>> {
        self.authors_update(id, author).await
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<bool> {
        self.authors_delete(id).await
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.genres_list().await
    }

    async fn find_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.genres_get_by_id(id).await
    }

    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        self.genres_get_by_name(name).await
    }

    async fn find_genres(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        self.genres_get_by_ids(ids).await
    }

    async fn create_genre(&self, genre: &NewGenre) -> AppResult<Genre> {
        self.genres_create(genre).await
    }

    async fn update_genre(&self, id: Uuid, genre: &NewGenre) -> AppResult<Option<Genre>> {
        self.genres_update(id, genre).await
    }

    async fn delete_genre(&self, id: Uuid) -> AppResult<bool> {
        self.genres_delete(id).await
    }

    async fn list_book_instances(&self) -> AppResult<Vec<BookInstance>> {
        self.book_instances_list().await
    }

    async fn find_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        self.book_instances_get_by_id(id).await
    }

    async fn instances_for_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        self.book_instances_by_book(book).await
    }

    async fn create_book_instance(&self, instance: &NewBookInstance) -> AppResult<BookInstance> {
        self.book_instances_create(instance).await
    }

    async fn update_book_instance(
        &self,
        id: Uuid,
        instance: &NewBookInstance,
    ) -> AppResult<Option<BookInstance>> {
        self.book_instances_update(id, instance).await
    }

    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool> {
        self.book_instances_delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_id_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let rows = vec![a, b, c];

        let ordered = in_id_order(&[c, Uuid::new_v4(), a], rows, |id| *id);
        assert_eq!(ordered, vec![c, a]);
    }
}
