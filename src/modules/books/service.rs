//! Book record service: list, create, update, and delete over the store.
//!
//! Mutations hold the write lock across the whole read-modify-save step and
//! build the new collection on a copy, so a failed save changes nothing.
//! The save itself runs on the blocking pool.

use std::path::PathBuf;
use std::sync::Arc;

use shelf_db::{Store, StoreError};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinError;

use super::models::{Book, BookFields};

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Book not found")]
    NotFound { id: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("store task failed: {0}")]
    Task(#[from] JoinError),
}

pub struct BookService {
    store: Arc<RwLock<Store<Book>>>,
}

impl BookService {
    pub fn new(store: Store<Book>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Open the collection file at `path`. A missing file is an empty shelf.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BookError> {
        Ok(Self::new(Store::open(path)?))
    }

    /// All books in stored order.
    pub async fn list(&self) -> Vec<Book> {
        self.store.read().await.snapshot().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn create(&self, fields: BookFields) -> Result<Book, BookError> {
        let book = self
            .mutate(move |store| {
                let book = Book::new(store.next_id(), fields);
                let mut books = store.snapshot().to_vec();
                books.push(book.clone());
                store.save(books)?;
                Ok(book)
            })
            .await?;

        tracing::info!(id = book.id, title = ?book.title, "book created");
        Ok(book)
    }

    /// Apply `fields` to the first book with `id`; omitted fields keep their
    /// stored value.
    pub async fn update(&self, id: u64, fields: BookFields) -> Result<Book, BookError> {
        let updated = self
            .mutate(move |store| {
                let mut books = store.snapshot().to_vec();
                let book = books
                    .iter_mut()
                    .find(|book| book.id == id)
                    .ok_or(BookError::NotFound { id })?;
                book.apply(fields);
                let updated = book.clone();
                store.save(books)?;
                Ok(updated)
            })
            .await?;

        tracing::info!(id, "book updated");
        Ok(updated)
    }

    /// Remove the first book with `id` and return it as it was.
    pub async fn delete(&self, id: u64) -> Result<Book, BookError> {
        let removed = self
            .mutate(move |store| {
                let mut books = store.snapshot().to_vec();
                let index = books
                    .iter()
                    .position(|book| book.id == id)
                    .ok_or(BookError::NotFound { id })?;
                let removed = books.remove(index);
                store.save(books)?;
                Ok(removed)
            })
            .await?;

        tracing::info!(id, "book deleted");
        Ok(removed)
    }

    /// Run `op` against the store on the blocking pool while holding the
    /// write lock.
    async fn mutate<R, F>(&self, op: F) -> Result<R, BookError>
    where
        F: FnOnce(&mut Store<Book>) -> Result<R, BookError> + Send + 'static,
        R: Send + 'static,
    {
        let mut store = self.store.clone().write_owned().await;
        tokio::task::spawn_blocking(move || op(&mut *store)).await?
    }
}
