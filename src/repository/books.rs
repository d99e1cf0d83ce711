//! Book domain methods on Repository
//!
//! Genre references live in `book_genres`, one row per (book, genre) with a
//! `position` column so the submitted order survives a round trip.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{in_id_order, reference_error, Repository};
use crate::{
    error::AppResult,
    models::book::{Book, BookSummary, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, author_id AS author, summary, isbn";

impl Repository {
    /// Title + author of every book, sorted by title
    pub async fn books_list(&self) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, author_id AS author FROM books ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn books_get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match book {
            Some(mut book) => {
                book.genre = self.books_genre_ids(id).await?;
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    pub async fn books_get_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<BookSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, author_id AS author FROM books WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(in_id_order(ids, rows, |b| b.id))
    }

    pub async fn books_by_author_id(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let mut books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY title",
            BOOK_COLUMNS
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await?;
        self.books_attach_genres(&mut books).await?;
        Ok(books)
    }

    pub async fn books_by_genre_id(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let mut books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books
            WHERE id IN (SELECT book_id FROM book_genres WHERE genre_id = $1)
            ORDER BY title
            "#,
            BOOK_COLUMNS
        ))
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;
        self.books_attach_genres(&mut books).await?;
        Ok(books)
    }

    pub async fn books_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a book and its genre references
    pub async fn books_create(&self, data: &NewBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let mut book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(data.author)
        .bind(&data.summary)
        .bind(&data.isbn)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| reference_error(e, "Book refers to an author that does not exist"))?;

        Self::books_insert_genres(&mut tx, book.id, &data.genre).await?;
        tx.commit().await?;

        book.genre = data.genre.clone();
        Ok(book)
    }

    /// Replace every field of a book, genre references included
    pub async fn books_update(&self, id: Uuid, data: &NewBook) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, summary = $4, isbn = $5
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&data.title)
        .bind(data.author)
        .bind(&data.summary)
        .bind(&data.isbn)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| reference_error(e, "Book refers to an author that does not exist"))?;

        let Some(mut book) = book else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::books_insert_genres(&mut tx, id, &data.genre).await?;
        tx.commit().await?;

        book.genre = data.genre.clone();
        Ok(Some(book))
    }

    async fn books_insert_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
        genres: &[Uuid],
    ) -> AppResult<()> {
        for (position, genre_id) in genres.iter().enumerate() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id, position) VALUES ($1, $2, $3)",
            )
            .bind(book_id)
            .bind(genre_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await
            .map_err(|e| reference_error(e, "Book refers to a genre that does not exist"))?;
        }
        Ok(())
    }

    async fn books_genre_ids(&self, book_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT genre_id FROM book_genres WHERE book_id = $1 ORDER BY position",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn books_attach_genres(&self, books: &mut [Book]) -> AppResult<()> {
        if books.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = books.iter().map(|b| b.id).collect();
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT book_id, genre_id FROM book_genres
            WHERE book_id = ANY($1)
            ORDER BY book_id, position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        for (book_id, genre_id) in rows {
            if let Some(book) = books.iter_mut().find(|b| b.id == book_id) {
                book.genre.push(genre_id);
            }
        }
        Ok(())
    }
}
