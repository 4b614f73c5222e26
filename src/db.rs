// 🗄️ Persistent Store Adapter
//
// One named slot holds the entire transaction list as a JSON array. The
// slot is read once at startup and rewritten wholesale after every
// mutation; there are no partial updates.

use crate::entities::Transaction;
use crate::error::StorageError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Slot name holding the serialized transaction list.
pub const TRANSACTIONS_SLOT: &str = "transactions";

/// Durable storage of whole string values under a key.
pub trait KeyValueStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, slot: &str, value: &str) -> Result<(), StorageError>;

    /// Short human-readable description for logs and the status bar.
    fn describe(&self) -> String;
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// Key-value slots in a local SQLite file.
pub struct SqliteStore {
    conn: Connection,
    label: String,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        setup_database(&conn)?;

        Ok(SqliteStore {
            conn,
            label: path.display().to_string(),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;

        Ok(SqliteStore {
            conn,
            label: ":memory:".to_string(),
        })
    }
}

pub fn setup_database(conn: &Connection) -> Result<(), StorageError> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS slots (
            name TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE name = ?1",
                params![slot],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO slots (name, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![slot, value],
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite {}", self.label)
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// Slots that live only as long as the process (`--ephemeral`, tests).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, as if a previous session had written `value`.
    pub fn with_slot(slot: &str, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.slots.insert(slot.to_string(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory (session only)".to_string()
    }
}

// ============================================================================
// ENCODING
// ============================================================================

/// Result of decoding a blob: the valid records plus the raw JSON of every
/// record that was dropped.
#[derive(Debug, Default)]
pub struct Decoded {
    pub transactions: Vec<Transaction>,
    pub dropped: Vec<String>,
}

/// Decodes a JSON array of transactions.
///
/// The blob as a whole must be a JSON array; individual records that fail to
/// deserialize or violate the amount/description invariants are dropped
/// rather than failing the whole load.
///
/// Dropped records are not kept in the list, so the next save of that list
/// removes them from the slot for good. Each one is logged in full at `warn`
/// level first, which is the only place it can be recovered from.
pub fn decode_transactions(blob: &str) -> Result<Decoded, StorageError> {
    if blob.trim().is_empty() || blob.trim() == "null" {
        return Ok(Decoded::default());
    }

    let raw: Vec<serde_json::Value> = serde_json::from_str(blob)?;
    let mut decoded = Decoded::default();

    for (position, value) in raw.into_iter().enumerate() {
        let raw_record = value.to_string();
        let record = serde_json::from_value::<Transaction>(value)
            .map_err(|e| e.to_string())
            .and_then(|tx| tx.check().map(|_| tx).map_err(|e| e.to_string()));

        match record {
            Ok(tx) => decoded.transactions.push(tx),
            Err(reason) => {
                warn!(position, %reason, record = %raw_record, "dropping invalid stored transaction");
                decoded.dropped.push(raw_record);
            }
        }
    }

    Ok(decoded)
}

pub fn encode_transactions(transactions: &[Transaction]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(transactions)?)
}

/// Reads the transactions slot. A missing slot is an empty list.
pub fn load_transactions(store: &dyn KeyValueStore) -> Result<Decoded, StorageError> {
    match store.read(TRANSACTIONS_SLOT)? {
        Some(blob) => decode_transactions(&blob),
        None => Ok(Decoded::default()),
    }
}

/// Rewrites the transactions slot with the full list.
pub fn save_transactions(
    store: &mut dyn KeyValueStore,
    transactions: &[Transaction],
) -> Result<(), StorageError> {
    let blob = encode_transactions(transactions)?;
    store.write(TRANSACTIONS_SLOT, &blob)?;
    debug!(count = transactions.len(), bytes = blob.len(), "saved transactions");
    Ok(())
}
