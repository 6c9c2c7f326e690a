//! File-backed collection store.
//!
//! A [`Store`] owns one ordered collection of records and the JSON file it
//! lives in. Every [`Store::save`] rewrites the whole file through a
//! temporary file and a rename, so the file on disk is always either the
//! previous or the new collection.

pub mod error;
mod persist;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use record::Record;
pub use store::Store;
