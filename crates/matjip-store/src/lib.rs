//! Matjip Storage Layer
//!
//! Implements the [`PlaceStore`] trait on top of SQLite.
//!
//! # Examples
//!
//! ```
//! use matjip_domain::traits::PlaceStore;
//! use matjip_domain::NewPlace;
//! use matjip_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! let place = store.insert(NewPlace::new("을지면옥", "서울 중구 충무로14길 2-1")).unwrap();
//! assert_eq!(store.list().unwrap(), vec![place]);
//! ```

#![warn(missing_docs)]

use matjip_domain::traits::PlaceStore;
use matjip_domain::{Category, NewPlace, Place, PlaceId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Place not found
    #[error("Place not found: {0}")]
    NotFound(PlaceId),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const SELECT_COLUMNS: &str = "SELECT id, name, address, category, shared_from, memo, instagram_url,
        latitude, longitude, user_id, created_at
     FROM places";

/// SQLite-based implementation of [`PlaceStore`]
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store across tasks behind
/// a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Number of stored places
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM places", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn conversion_error(column: usize, err: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    }

    fn row_to_place(row: &Row<'_>) -> rusqlite::Result<Place> {
        let id: String = row.get(0)?;
        let id = PlaceId::from_string(&id)
            .map_err(|e| Self::conversion_error(0, StoreError::InvalidData(e)))?;

        let category: Option<String> = row.get(3)?;
        let category = category
            .map(|c| {
                Category::parse(&c).ok_or_else(|| {
                    Self::conversion_error(
                        3,
                        StoreError::InvalidData(format!("Unknown category: {}", c)),
                    )
                })
            })
            .transpose()?;

        Ok(Place {
            id,
            name: row.get(1)?,
            address: row.get(2)?,
            category,
            shared_from: row.get(4)?,
            memo: row.get(5)?,
            instagram_url: row.get(6)?,
            latitude: row.get(7)?,
            longitude: row.get(8)?,
            user_id: row.get(9)?,
            created_at: row.get::<_, i64>(10)? as u64,
        })
    }
}

impl PlaceStore for SqliteStore {
    type Error = StoreError;

    fn insert(&mut self, place: NewPlace) -> Result<Place, Self::Error> {
        place.validate().map_err(StoreError::InvalidData)?;

        let stored = Place {
            id: PlaceId::new(),
            latitude: place.coordinate.map(|c| c.lat),
            longitude: place.coordinate.map(|c| c.lng),
            name: place.name,
            address: place.address,
            category: place.category,
            shared_from: place.shared_from,
            memo: place.memo,
            instagram_url: place.instagram_url,
            user_id: place.user_id,
            created_at: Self::now_millis(),
        };

        self.conn.execute(
            "INSERT INTO places (id, name, address, category, shared_from, memo, instagram_url,
                                 latitude, longitude, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                stored.id.to_string(),
                &stored.name,
                &stored.address,
                stored.category.map(|c| c.as_str()),
                &stored.shared_from,
                &stored.memo,
                &stored.instagram_url,
                stored.latitude,
                stored.longitude,
                &stored.user_id,
                stored.created_at as i64,
            ],
        )?;

        debug!("Inserted place {} ({})", stored.id, stored.name);
        Ok(stored)
    }

    fn get(&self, id: PlaceId) -> Result<Option<Place>, Self::Error> {
        let place = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id.to_string()],
                Self::row_to_place,
            )
            .optional()?;
        Ok(place)
    }

    fn list(&self) -> Result<Vec<Place>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY created_at DESC, rowid DESC", SELECT_COLUMNS))?;

        let places = stmt
            .query_map([], Self::row_to_place)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(places)
    }

    fn delete(&mut self, id: PlaceId) -> Result<(), Self::Error> {
        let affected = self
            .conn
            .execute("DELETE FROM places WHERE id = ?1", params![id.to_string()])?;

        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!("Deleted place {}", id);
        Ok(())
    }
}
