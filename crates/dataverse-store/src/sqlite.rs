//! SQLite implementation of the IndexStore trait.
//!
//! This is the persistent backend for the secondary index. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use dataverse_core::TxId;

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{
    AttestationEntry, IndexStore, InsertResult, NotarizationEntry, RegistrationEntry,
};

/// SQLite-based secondary index.
///
/// Thread-safe via internal Mutex, which also serializes writers, so the
/// unique-registration check and insert cannot interleave. All operations
/// use spawn_blocking to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteIndex {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteIndex {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(format!("sqlite connection: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

// Helper to read a 32-byte transaction id column
fn column_tx_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<TxId> {
    let bytes: Vec<u8> = row.get(idx)?;
    TxId::try_from(bytes.as_slice()).map_err(|_| {
        rusqlite::Error::InvalidColumnType(idx, "tx_id".into(), rusqlite::types::Type::Blob)
    })
}

fn column_bytes(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Bytes> {
    let bytes: Vec<u8> = row.get(idx)?;
    Ok(Bytes::from(bytes))
}

#[async_trait]
impl IndexStore for SqliteIndex {
    async fn insert_registration(&self, entry: &RegistrationEntry) -> Result<InsertResult> {
        let entry = entry.clone();

        self.blocking(move |conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO registered_machines (content_id, tx_id, indexed_at)
                 VALUES (?1, ?2, ?3)",
                params![entry.content_id.as_ref(), entry.tx_id.0.as_slice(), now_millis()],
            )?;

            Ok(if changed == 0 {
                InsertResult::AlreadyExists
            } else {
                InsertResult::Inserted
            })
        })
        .await
    }

    async fn get_registration(&self, content_id: &[u8]) -> Result<Option<RegistrationEntry>> {
        let content_id = content_id.to_vec();

        self.blocking(move |conn| {
            conn.query_row(
                "SELECT content_id, tx_id FROM registered_machines WHERE content_id = ?1",
                params![content_id],
                |row| {
                    Ok(RegistrationEntry {
                        content_id: column_bytes(row, 0)?,
                        tx_id: column_tx_id(row, 1)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn upsert_attestation(&self, entry: &AttestationEntry) -> Result<()> {
        let entry = entry.clone();

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO attested_machines
                    (machine_address, content_id, category, manufacturer, tx_id, indexed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(machine_address) DO UPDATE SET
                    content_id = excluded.content_id,
                    category = excluded.category,
                    manufacturer = excluded.manufacturer,
                    tx_id = excluded.tx_id,
                    indexed_at = excluded.indexed_at",
                params![
                    entry.machine_address.as_ref(),
                    entry.content_id.as_ref(),
                    entry.category.as_ref(),
                    entry.manufacturer.as_ref(),
                    entry.tx_id.0.as_slice(),
                    now_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_attestation(&self, machine_address: &[u8]) -> Result<Option<AttestationEntry>> {
        let machine_address = machine_address.to_vec();

        self.blocking(move |conn| {
            conn.query_row(
                "SELECT machine_address, content_id, category, manufacturer, tx_id
                 FROM attested_machines WHERE machine_address = ?1",
                params![machine_address],
                |row| {
                    Ok(AttestationEntry {
                        machine_address: column_bytes(row, 0)?,
                        content_id: column_bytes(row, 1)?,
                        category: column_bytes(row, 2)?,
                        manufacturer: column_bytes(row, 3)?,
                        tx_id: column_tx_id(row, 4)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn upsert_notarization(&self, entry: &NotarizationEntry) -> Result<()> {
        let entry = entry.clone();

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO notarized_data (data_content_id, owner_address, tx_id, indexed_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(data_content_id) DO UPDATE SET
                    owner_address = excluded.owner_address,
                    tx_id = excluded.tx_id,
                    indexed_at = excluded.indexed_at",
                params![
                    entry.data_content_id.as_ref(),
                    entry.owner_address.as_ref(),
                    entry.tx_id.0.as_slice(),
                    now_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_notarization(
        &self,
        data_content_id: &[u8],
    ) -> Result<Option<NotarizationEntry>> {
        let data_content_id = data_content_id.to_vec();

        self.blocking(move |conn| {
            conn.query_row(
                "SELECT data_content_id, owner_address, tx_id
                 FROM notarized_data WHERE data_content_id = ?1",
                params![data_content_id],
                |row| {
                    Ok(NotarizationEntry {
                        data_content_id: column_bytes(row, 0)?,
                        owner_address: column_bytes(row, 1)?,
                        tx_id: column_tx_id(row, 2)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn has_notarization(&self, data_content_id: &[u8]) -> Result<bool> {
        let data_content_id = data_content_id.to_vec();

        self.blocking(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM notarized_data WHERE data_content_id = ?1)",
                params![data_content_id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(cid: &'static [u8], tx: u8) -> RegistrationEntry {
        RegistrationEntry {
            content_id: Bytes::from_static(cid),
            tx_id: TxId::from_bytes([tx; 32]),
        }
    }

    fn attestation(tx: u8) -> AttestationEntry {
        AttestationEntry {
            machine_address: Bytes::from(vec![b'A'; 44]),
            content_id: Bytes::from(vec![b'b'; 66]),
            category: Bytes::from_static(b"sensor"),
            manufacturer: Bytes::from_static(b"Acme"),
            tx_id: TxId::from_bytes([tx; 32]),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_registration() {
        let index = SqliteIndex::open_memory().unwrap();

        let result = index.insert_registration(&registration(b"cidA", 1)).await.unwrap();
        assert_eq!(result, InsertResult::Inserted);

        let stored = index.get_registration(b"cidA").await.unwrap().unwrap();
        assert_eq!(stored.tx_id, TxId::from_bytes([1; 32]));
        assert!(index.get_registration(b"cidB").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let index = SqliteIndex::open_memory().unwrap();

        let r1 = index.insert_registration(&registration(b"cidA", 1)).await.unwrap();
        let r2 = index.insert_registration(&registration(b"cidA", 2)).await.unwrap();
        assert_eq!(r1, InsertResult::Inserted);
        assert_eq!(r2, InsertResult::AlreadyExists);

        let stored = index.get_registration(b"cidA").await.unwrap().unwrap();
        assert_eq!(stored.tx_id, TxId::from_bytes([1; 32]));
    }

    #[tokio::test]
    async fn test_concurrent_registration_single_winner() {
        let index = SqliteIndex::open_memory().unwrap();

        let mut handles = Vec::new();
        for tx in 0..8u8 {
            let index = index.clone();
            handles.push(tokio::spawn(async move {
                index.insert_registration(&registration(b"cidA", tx)).await.unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() == InsertResult::Inserted {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
    }

    #[tokio::test]
    async fn test_attestation_upsert() {
        let index = SqliteIndex::open_memory().unwrap();

        index.upsert_attestation(&attestation(1)).await.unwrap();
        let mut updated = attestation(2);
        updated.category = Bytes::from_static(b"camera");
        index.upsert_attestation(&updated).await.unwrap();

        let stored = index.get_attestation(&[b'A'; 44]).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_notarization_exists() {
        let index = SqliteIndex::open_memory().unwrap();
        let entry = NotarizationEntry {
            data_content_id: Bytes::from_static(b"bafydata"),
            owner_address: Bytes::from(vec![b'A'; 44]),
            tx_id: TxId::from_bytes([3; 32]),
        };

        assert!(!index.has_notarization(b"bafydata").await.unwrap());
        index.upsert_notarization(&entry).await.unwrap();
        assert!(index.has_notarization(b"bafydata").await.unwrap());
        assert!(!index.has_notarization(b"bafyother").await.unwrap());
        assert_eq!(index.get_notarization(b"bafydata").await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        {
            let index = SqliteIndex::open(&path).unwrap();
            index.insert_registration(&registration(b"cidA", 1)).await.unwrap();
        }

        let index = SqliteIndex::open(&path).unwrap();
        assert!(index.get_registration(b"cidA").await.unwrap().is_some());
    }
}
