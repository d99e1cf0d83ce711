//! Book instance domain methods on Repository

use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use super::{reference_error, Repository};
use crate::{
    error::AppResult,
    models::book_instance::{BookInstance, BookInstanceStatus, NewBookInstance},
};

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, status, due_back";

impl<'r> FromRow<'r, PgRow> for BookInstance {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Self {
            id: row.try_get("id")?,
            book: row.try_get("book_id")?,
            imprint: row.try_get("imprint")?,
            status: status
                .parse::<BookInstanceStatus>()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            due_back: row.try_get("due_back")?,
        })
    }
}

impl Repository {
    pub async fn book_instances_list(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances ORDER BY due_back, imprint",
            INSTANCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn book_instances_get_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE id = $1",
            INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Copies of one book
    pub async fn book_instances_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE book_id = $1 ORDER BY due_back, imprint",
            INSTANCE_COLUMNS
        ))
        .bind(book)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count copies, all or with one status
    pub async fn book_instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn book_instances_create(&self, data: &NewBookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            INSERT INTO book_instances (book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| reference_error(e, "Book instance refers to a book that does not exist"))?;
        Ok(row)
    }

    pub async fn book_instances_update(
        &self,
        id: Uuid,
        data: &NewBookInstance,
    ) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(id)
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| reference_error(e, "Book instance refers to a book that does not exist"))?;
        Ok(row)
    }

    pub async fn book_instances_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
