use serde::{Deserialize, Deserializer, Serialize};
use shelf_db::Record;

/// Reading status given to books created without one.
pub const DEFAULT_STATUS: &str = "want-to-read";

/// A book tracked on the shelf.
///
/// Every field is populated once the record exists; missing or `null`
/// values from older files are filled with the same defaults used at
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier assigned by the store
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Cover image URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover: String,
    /// Conventionally 0-5, not enforced
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: String,
    /// Free-form reading status, e.g. `want-to-read`, `reading`, `finished`
    #[serde(default = "default_status", deserialize_with = "null_as_default_status")]
    pub status: String,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

/// Present-but-null becomes `Some(None)`; an absent key stays `None` via
/// `#[serde(default)]`.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl Record for Book {
    const COLLECTION: &'static str = "books";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Caller-supplied book fields for create and update requests.
///
/// `title` and `author` are nullable: an absent key leaves them alone and
/// `null` clears them. For the other fields absent and `null` are the same
/// thing, the field is not being set. An `id` in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookFields {
    #[serde(default, deserialize_with = "explicit_null")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub author: Option<Option<String>>,
    pub cover: Option<String>,
    pub rating: Option<f64>,
    pub pages: Option<i64>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

impl Book {
    /// Build a new record, substituting defaults for anything not supplied.
    pub fn new(id: u64, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title.flatten(),
            author: fields.author.flatten(),
            cover: fields.cover.unwrap_or_default(),
            rating: fields.rating.unwrap_or_default(),
            pages: fields.pages.unwrap_or_default(),
            genre: fields.genre.unwrap_or_default(),
            status: fields.status.unwrap_or_else(default_status),
        }
    }

    /// Overwrite only the supplied fields.
    pub fn apply(&mut self, fields: BookFields) {
        let BookFields {
            title,
            author,
            cover,
            rating,
            pages,
            genre,
            status,
        } = fields;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(author) = author {
            self.author = author;
        }
        if let Some(cover) = cover {
            self.cover = cover;
        }
        if let Some(rating) = rating {
            self.rating = rating;
        }
        if let Some(pages) = pages {
            self.pages = pages;
        }
        if let Some(genre) = genre {
            self.genre = genre;
        }
        if let Some(status) = status {
            self.status = status;
        }
    }
}
