//! In-process catalog store.
//!
//! Used when `database.url` is `memory:` and by the test suite. Reference
//! rules mirror the foreign keys of the SQL schema: a book needs an existing
//! author and genres, a copy needs an existing book, and referenced authors,
//! genres and books cannot be removed.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogStore, AUTHOR_HAS_BOOKS, GENRE_HAS_BOOKS};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookInstance, BookInstanceStatus, BookSummary, Genre, NewAuthor, NewBook,
        NewBookInstance, NewGenre,
    },
};

#[derive(Default)]
struct Tables {
    authors: IndexMap<Uuid, Author>,
    genres: IndexMap<Uuid, Genre>,
    books: IndexMap<Uuid, Book>,
    instances: IndexMap<Uuid, BookInstance>,
}

impl Tables {
    fn check_book_references(&self, book: &NewBook) -> AppResult<()> {
        if !self.authors.contains_key(&book.author) {
            return Err(missing_reference("Book refers to an author that does not exist"));
        }
        if book.genre.iter().any(|g| !self.genres.contains_key(g)) {
            return Err(missing_reference("Book refers to a genre that does not exist"));
        }
        Ok(())
    }

    fn check_instance_references(&self, instance: &NewBookInstance) -> AppResult<()> {
        if !self.books.contains_key(&instance.book) {
            return Err(missing_reference("Book instance refers to a book that does not exist"));
        }
        Ok(())
    }
}

fn missing_reference(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

fn sorted_books(mut books: Vec<Book>) -> Vec<Book> {
    books.sort_by(|a, b| a.title.cmp(&b.title));
    books
}

/// Catalog kept in memory behind a read/write lock
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {}

    async fn count_books(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.books.len() as i64)
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.authors.len() as i64)
    }

    async fn count_genres(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.genres.len() as i64)
    }

    async fn count_book_instances(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .instances
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .count();
        Ok(count as i64)
    }

    async fn list_books(&self) -> AppResult<Vec<BookSummary>> {
        let tables = self.tables.read().await;
        let mut books: Vec<BookSummary> = tables.books.values().map(BookSummary::from).collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn find_books(&self, ids: &[Uuid]) -> AppResult<Vec<BookSummary>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.books.get(id))
            .map(BookSummary::from)
            .collect())
    }

    async fn books_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        let books = tables
            .books
            .values()
            .filter(|b| b.author == author)
            .cloned()
            .collect();
        Ok(sorted_books(books))
    }

    async fn books_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        let books = tables
            .books
            .values()
            .filter(|b| b.genre.contains(&genre))
            .cloned()
            .collect();
        Ok(sorted_books(books))
    }

    async fn create_book(&self, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables.check_book_references(book)?;
        let created = Book {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            author: book.author,
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.clone(),
        };
        tables.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_book(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&id) {
            return Ok(None);
        }
        tables.check_book_references(book)?;
        let updated = Book {
            id,
            title: book.title.clone(),
            author: book.author,
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.clone(),
        };
        tables.books.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            a.family_name
                .cmp(&b.family_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(authors)
    }

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn find_authors(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.authors.get(id))
            .cloned()
            .collect())
    }

    async fn create_author(&self, author: &NewAuthor) -> AppResult<Author> {
        let created = Author {
            id: Uuid::new_v4(),
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        };
        self.tables
            .write()
            .await
            .authors
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_author(&self, id: Uuid, author: &NewAuthor) -> AppResult<Option<Author>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.authors.get_mut(&id) else {
            return Ok(None);
        };
        existing.first_name = author.first_name.clone();
        existing.family_name = author.family_name.clone();
        existing.date_of_birth = author.date_of_birth;
        existing.date_of_death = author.date_of_death;
        Ok(Some(existing.clone()))
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.author == id) {
            return Err(AppError::BadRequest(AUTHOR_HAS_BOOKS.to_string()));
        }
        Ok(tables.authors.shift_remove(&id).is_some())
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        let mut genres: Vec<Genre> = tables.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn find_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.tables.read().await.genres.get(&id).cloned())
    }

    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables.genres.values().find(|g| g.name == name).cloned())
    }

    async fn find_genres(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.genres.get(id))
            .cloned()
            .collect())
    }

    async fn create_genre(&self, genre: &NewGenre) -> AppResult<Genre> {
        let created = Genre {
            id: Uuid::new_v4(),
            name: genre.name.clone(),
        };
        self.tables
            .write()
            .await
            .genres
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_genre(&self, id: Uuid, genre: &NewGenre) -> AppResult<Option<Genre>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.genres.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = genre.name.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete_genre(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.genre.contains(&id)) {
            return Err(AppError::BadRequest(GENRE_HAS_BOOKS.to_string()));
        }
        Ok(tables.genres.shift_remove(&id).is_some())
    }

    async fn list_book_instances(&self) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.read().await;
        let mut instances: Vec<BookInstance> = tables.instances.values().cloned().collect();
        instances.sort_by(|a, b| {
            a.due_back
                .cmp(&b.due_back)
                .then_with(|| a.imprint.cmp(&b.imprint))
        });
        Ok(instances)
    }

    async fn find_book_instance(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.tables.read().await.instances.get(&id).cloned())
    }

    async fn instances_for_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.read().await;
        Ok(tables
            .instances
            .values()
            .filter(|i| i.book == book)
            .cloned()
            .collect())
    }

    async fn create_book_instance(&self, instance: &NewBookInstance) -> AppResult<BookInstance> {
        let mut tables = self.tables.write().await;
        tables.check_instance_references(instance)?;
        let created = BookInstance {
            id: Uuid::new_v4(),
            book: instance.book,
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back,
        };
        tables.instances.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_book_instance(
        &self,
        id: Uuid,
        instance: &NewBookInstance,
    ) -> AppResult<Option<BookInstance>> {
        let mut tables = self.tables.write().await;
        if !tables.instances.contains_key(&id) {
            return Ok(None);
        }
        tables.check_instance_references(instance)?;
        let updated = BookInstance {
            id,
            book: instance.book,
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back,
        };
        tables.instances.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_book_instance(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.instances.shift_remove(&id).is_some())
    }
}
