//! Catalog service
//!
//! Reads that do not depend on each other are issued together and joined
//! before anything is rendered. `tokio::try_join!` gives the all-or-nothing
//! behaviour every page relies on except the home page, where each count
//! may fail on its own.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorDetail, Book, BookDetail, BookInstance, BookInstanceDetail,
        BookInstanceListEntry, BookInstanceStatus, BookListEntry, BookSummary, Genre, GenreDetail,
        NewAuthor, NewBook, NewBookInstance, NewGenre,
    },
    repository::CatalogStore,
};

/// A count shown on the home page, or the message of the query that failed
pub type Count = Result<i64, String>;

/// Home page figures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCounts {
    pub book_count: Count,
    pub book_instance_count: Count,
    pub book_instance_available_count: Count,
    pub author_count: Count,
    pub genre_count: Count,
}

/// Lists used to fill the book form's selection controls
#[derive(Debug, Clone)]
pub struct BookFormOptions {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

/// Result of a delete request on an entity other books depend on
#[derive(Debug, Clone)]
pub enum DeleteOutcome<T> {
    Deleted,
    /// Still referenced; carries what to show the user
    Blocked(T),
}

/// Result of creating a genre
#[derive(Debug, Clone)]
pub enum GenreCreated {
    Created(Genre),
    /// A genre with the same name already existed
    Existing(Genre),
}

impl GenreCreated {
    pub fn genre(&self) -> &Genre {
        match self {
            GenreCreated::Created(genre) | GenreCreated::Existing(genre) => genre,
        }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    // =========================================================================
    // HOME
    // =========================================================================

    /// The five home page counts, each independent of the others
    pub async fn counts(&self) -> CatalogCounts {
        let (books, instances, available, authors, genres) = tokio::join!(
            self.store.count_books(),
            self.store.count_book_instances(None),
            self.store.count_book_instances(Some(BookInstanceStatus::Available)),
            self.store.count_authors(),
            self.store.count_genres(),
        );

        CatalogCounts {
            book_count: into_count(books),
            book_instance_count: into_count(instances),
            book_instance_available_count: into_count(available),
            author_count: into_count(authors),
            genre_count: into_count(genres),
        }
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    /// Books by title with their authors resolved
    pub async fn book_list(&self) -> AppResult<Vec<BookListEntry>> {
        let books = self.store.list_books().await?;
        let author_ids: Vec<Uuid> = books
            .iter()
            .map(|b| b.author)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        let authors: IndexMap<Uuid, Author> = self
            .store
            .find_authors(&author_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author).cloned();
                BookListEntry { book, author }
            })
            .collect())
    }

    pub async fn book_detail(&self, id: Uuid) -> AppResult<BookDetail> {
        let (book, instances) = tokio::try_join!(
            self.store.find_book(id),
            self.store.instances_for_book(id),
        )?;
        let book = book.ok_or_else(|| book_not_found(id))?;
        let (author, genres) = self.populate_book(&book).await?;

        Ok(BookDetail {
            book,
            author,
            genres,
            instances,
        })
    }

    /// Authors and genres for an empty or re-rendered book form
    pub async fn book_form_options(&self) -> AppResult<BookFormOptions> {
        let (authors, genres) =
            tokio::try_join!(self.store.list_authors(), self.store.list_genres())?;
        Ok(BookFormOptions { authors, genres })
    }

    /// A book to edit, with the form's selection lists
    pub async fn book_for_update(&self, id: Uuid) -> AppResult<(Book, BookFormOptions)> {
        let (book, authors, genres) = tokio::try_join!(
            self.store.find_book(id),
            self.store.list_authors(),
            self.store.list_genres(),
        )?;
        let book = book.ok_or_else(|| book_not_found(id))?;
        Ok((book, BookFormOptions { authors, genres }))
    }

    pub async fn create_book(&self, data: &NewBook) -> AppResult<Book> {
        let book = self.store.create_book(data).await?;
        tracing::info!("Catalog: created book id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    /// Replace a book, keeping its identifier
    pub async fn update_book(&self, id: Uuid, data: &NewBook) -> AppResult<Book> {
        let book = self
            .store
            .update_book(id, data)
            .await?
            .ok_or_else(|| book_not_found(id))?;
        tracing::info!("Catalog: updated book id={}", book.id);
        Ok(book)
    }

    async fn populate_book(&self, book: &Book) -> AppResult<(Option<Author>, Vec<Genre>)> {
        tokio::try_join!(
            self.store.find_author(book.author),
            self.store.find_genres(&book.genre),
        )
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn author_list(&self) -> AppResult<Vec<Author>> {
        self.store.list_authors().await
    }

    pub async fn author_detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        self.find_author_detail(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    /// Author and their books, or `None` when the author does not exist
    pub async fn find_author_detail(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = tokio::try_join!(
            self.store.find_author(id),
            self.store.books_by_author(id),
        )?;
        Ok(author.map(|author| AuthorDetail { author, books }))
    }

    pub async fn find_author(&self, id: Uuid) -> AppResult<Author> {
        self.store
            .find_author(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    pub async fn create_author(&self, data: &NewAuthor) -> AppResult<Author> {
        let author = self.store.create_author(data).await?;
        tracing::info!("Catalog: created author id={}", author.id);
        Ok(author)
    }

    pub async fn update_author(&self, id: Uuid, data: &NewAuthor) -> AppResult<Author> {
        let author = self
            .store
            .update_author(id, data)
            .await?
            .ok_or_else(|| author_not_found(id))?;
        tracing::info!("Catalog: updated author id={}", author.id);
        Ok(author)
    }

    /// Delete an author who has no books left
    pub async fn delete_author(&self, id: Uuid) -> AppResult<DeleteOutcome<AuthorDetail>> {
        let Some(detail) = self.find_author_detail(id).await? else {
            return Ok(DeleteOutcome::Deleted);
        };
        if !detail.books.is_empty() {
            return Ok(DeleteOutcome::Blocked(detail));
        }
        self.store.delete_author(id).await?;
        tracing::info!("Catalog: deleted author id={}", id);
        Ok(DeleteOutcome::Deleted)
    }

    // =========================================================================
    // GENRES
    // =========================================================================

    pub async fn genre_list(&self) -> AppResult<Vec<Genre>> {
        self.store.list_genres().await
    }

    pub async fn genre_detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        self.find_genre_detail(id)
            .await?
            .ok_or_else(|| genre_not_found(id))
    }

    pub async fn find_genre_detail(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, books) =
            tokio::try_join!(self.store.find_genre(id), self.store.books_by_genre(id))?;
        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }

    pub async fn find_genre(&self, id: Uuid) -> AppResult<Genre> {
        self.store
            .find_genre(id)
            .await?
            .ok_or_else(|| genre_not_found(id))
    }

    /// Create a genre unless one with the same name exists
    pub async fn create_genre(&self, data: &NewGenre) -> AppResult<GenreCreated> {
        if let Some(existing) = self.store.find_genre_by_name(&data.name).await? {
            return Ok(GenreCreated::Existing(existing));
        }
        let genre = self.store.create_genre(data).await?;
        tracing::info!("Catalog: created genre id={} name={:?}", genre.id, genre.name);
        Ok(GenreCreated::Created(genre))
    }

    pub async fn update_genre(&self, id: Uuid, data: &NewGenre) -> AppResult<Genre> {
        let genre = self
            .store
            .update_genre(id, data)
            .await?
            .ok_or_else(|| genre_not_found(id))?;
        tracing::info!("Catalog: updated genre id={}", genre.id);
        Ok(genre)
    }

    pub async fn delete_genre(&self, id: Uuid) -> AppResult<DeleteOutcome<GenreDetail>> {
        let Some(detail) = self.find_genre_detail(id).await? else {
            return Ok(DeleteOutcome::Deleted);
        };
        if !detail.books.is_empty() {
            return Ok(DeleteOutcome::Blocked(detail));
        }
        self.store.delete_genre(id).await?;
        tracing::info!("Catalog: deleted genre id={}", id);
        Ok(DeleteOutcome::Deleted)
    }

    // =========================================================================
    // BOOK INSTANCES
    // =========================================================================

    /// Every copy with its book title resolved
    pub async fn book_instance_list(&self) -> AppResult<Vec<BookInstanceListEntry>> {
        let instances = self.store.list_book_instances().await?;
        let book_ids: Vec<Uuid> = instances
            .iter()
            .map(|i| i.book)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        let books: IndexMap<Uuid, BookSummary> = self
            .store
            .find_books(&book_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(instances
            .into_iter()
            .map(|instance| {
                let book = books.get(&instance.book).cloned();
                BookInstanceListEntry { instance, book }
            })
            .collect())
    }

    pub async fn book_instance_detail(&self, id: Uuid) -> AppResult<BookInstanceDetail> {
        let instance = self.find_book_instance(id).await?;
        let book = self
            .store
            .find_books(&[instance.book])
            .await?
            .into_iter()
            .next();
        Ok(BookInstanceDetail { instance, book })
    }

    pub async fn find_book_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.store
            .find_book_instance(id)
            .await?
            .ok_or_else(|| book_instance_not_found(id))
    }

    /// Books offered in the copy form
    pub async fn book_choices(&self) -> AppResult<Vec<BookSummary>> {
        self.store.list_books().await
    }

    pub async fn book_instance_for_update(
        &self,
        id: Uuid,
    ) -> AppResult<(BookInstance, Vec<BookSummary>)> {
        let (instance, books) = tokio::try_join!(
            self.store.find_book_instance(id),
            self.store.list_books(),
        )?;
        let instance = instance.ok_or_else(|| book_instance_not_found(id))?;
        Ok((instance, books))
    }

    pub async fn create_book_instance(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        let instance = self.store.create_book_instance(data).await?;
        tracing::info!(
            "Catalog: created book instance id={} book={}",
            instance.id,
            instance.book
        );
        Ok(instance)
    }

    pub async fn update_book_instance(
        &self,
        id: Uuid,
        data: &NewBookInstance,
    ) -> AppResult<BookInstance> {
        let instance = self
            .store
            .update_book_instance(id, data)
            .await?
            .ok_or_else(|| book_instance_not_found(id))?;
        tracing::info!("Catalog: updated book instance id={}", instance.id);
        Ok(instance)
    }

    pub async fn delete_book_instance(&self, id: Uuid) -> AppResult<()> {
        if self.store.delete_book_instance(id).await? {
            tracing::info!("Catalog: deleted book instance id={}", id);
        }
        Ok(())
    }
}

fn into_count(result: AppResult<i64>) -> Count {
    result.map_err(|e| {
        tracing::error!("Catalog count failed: {}", e);
        e.to_string()
    })
}

fn book_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

fn author_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

fn genre_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Genre {} not found", id))
}

fn book_instance_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book instance {} not found", id))
}
