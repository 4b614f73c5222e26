// 📒 Transaction Repository - the session's single source of truth
//
// Holds the ordered list in memory and mirrors it to a KeyValueStore after
// every successful mutation. Storage failures never undo an in-memory
// change: the mutation succeeds and reports `Persistence::SessionOnly`.

use crate::db::{self, KeyValueStore};
use crate::entities::{NewTransaction, Transaction, TransactionId};
use crate::error::TrackerError;
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Whether a mutation reached durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Durable,
    /// Kept in memory only; the string explains why storage was skipped.
    SessionOnly(String),
}

impl Persistence {
    pub fn is_durable(&self) -> bool {
        matches!(self, Persistence::Durable)
    }
}

/// Outcome of `TransactionRepository::import`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub imported: usize,
    pub rejected: usize,
    pub skipped_existing: usize,
    pub persistence: Persistence,
}

pub struct TransactionRepository {
    transactions: Vec<Transaction>,
    store: Box<dyn KeyValueStore>,
    /// Set when the slot could not be read at startup. Writing would
    /// overwrite data we failed to load, so the session stays in memory.
    session_only: Option<String>,
}

impl TransactionRepository {
    /// Loads the list from `store`. Read or decode failures are returned as
    /// `StorageUnavailable`; see `open_or_session_only` for the lenient path.
    pub fn open(store: Box<dyn KeyValueStore>) -> Result<Self, TrackerError> {
        let decoded = db::load_transactions(store.as_ref())?;
        info!(
            count = decoded.transactions.len(),
            dropped = decoded.dropped.len(),
            store = %store.describe(),
            "loaded transactions"
        );

        Ok(TransactionRepository {
            transactions: decoded.transactions,
            store,
            session_only: None,
        })
    }

    /// Like `open`, but an unreadable slot degrades to an empty,
    /// session-only repository instead of failing.
    pub fn open_or_session_only(store: Box<dyn KeyValueStore>) -> Self {
        let description = store.describe();
        match db::load_transactions(store.as_ref()) {
            Ok(decoded) => {
                info!(
                    count = decoded.transactions.len(),
                    dropped = decoded.dropped.len(),
                    store = %description,
                    "loaded transactions"
                );
                TransactionRepository {
                    transactions: decoded.transactions,
                    store,
                    session_only: None,
                }
            }
            Err(err) => {
                warn!(error = %err, store = %description, "storage unavailable, continuing session-only");
                TransactionRepository {
                    transactions: Vec::new(),
                    store,
                    session_only: Some(err.to_string()),
                }
            }
        }
    }

    /// Current records in insertion order.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Why the session is not being persisted, if it isn't.
    pub fn storage_warning(&self) -> Option<&str> {
        self.session_only.as_deref()
    }

    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Validates `input`, dates it today and appends it.
    /// "Today" is the user's local calendar date, not the UTC date.
    pub fn add(
        &mut self,
        input: &NewTransaction,
    ) -> Result<(TransactionId, Persistence), TrackerError> {
        self.add_on(input, Local::now().date_naive())
    }

    /// `add` with an explicit date.
    pub fn add_on(
        &mut self,
        input: &NewTransaction,
        date: NaiveDate,
    ) -> Result<(TransactionId, Persistence), TrackerError> {
        let tx = input.validate(date)?;
        let id = tx.id;
        debug!(%id, amount = tx.amount, category = %tx.category, kind = %tx.kind, "adding transaction");

        self.transactions.push(tx);
        Ok((id, self.persist()))
    }

    /// Removes the record at `index` of the unfiltered list.
    pub fn remove_at(&mut self, index: usize) -> Result<(Transaction, Persistence), TrackerError> {
        let len = self.transactions.len();
        if index >= len {
            return Err(TrackerError::IndexOutOfRange { index, len });
        }

        let removed = self.transactions.remove(index);
        debug!(id = %removed.id, index, "removed transaction");
        Ok((removed, self.persist()))
    }

    /// Removes the record with `id`, wherever it sits in the list.
    pub fn remove(&mut self, id: TransactionId) -> Result<(Transaction, Persistence), TrackerError> {
        let index = self
            .transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or(TrackerError::NotFound(id))?;

        self.remove_at(index)
    }

    /// Appends already-built records (e.g. a JSON export), skipping ids that
    /// are already present and records that break the invariants. Storage is
    /// written once at the end.
    pub fn import(&mut self, records: Vec<Transaction>) -> ImportReport {
        let mut known: HashSet<TransactionId> = self.transactions.iter().map(|tx| tx.id).collect();
        let mut imported = 0;
        let mut rejected = 0;
        let mut skipped_existing = 0;

        for tx in records {
            if let Err(err) = tx.check() {
                warn!(id = %tx.id, error = %err, "rejecting imported transaction");
                rejected += 1;
                continue;
            }
            if !known.insert(tx.id) {
                skipped_existing += 1;
                continue;
            }
            self.transactions.push(tx);
            imported += 1;
        }

        info!(imported, rejected, skipped_existing, "import finished");

        let persistence = if imported > 0 {
            self.persist()
        } else {
            self.current_persistence()
        };

        ImportReport {
            imported,
            rejected,
            skipped_existing,
            persistence,
        }
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    fn current_persistence(&self) -> Persistence {
        match &self.session_only {
            Some(reason) => Persistence::SessionOnly(reason.clone()),
            None => Persistence::Durable,
        }
    }

    /// Rewrites the slot with the full list.
    fn persist(&mut self) -> Persistence {
        if let Some(reason) = &self.session_only {
            return Persistence::SessionOnly(reason.clone());
        }

        match db::save_transactions(self.store.as_mut(), &self.transactions) {
            Ok(()) => Persistence::Durable,
            Err(err) => {
                let err = TrackerError::StorageUnavailable(err);
                warn!(error = %err, "could not persist transactions, change kept in memory");
                Persistence::SessionOnly(err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for TransactionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionRepository")
            .field("transactions", &self.transactions.len())
            .field("store", &self.store.describe())
            .field("session_only", &self.session_only)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::totals;
    use crate::db::{MemoryStore, SqliteStore, TRANSACTIONS_SLOT};
    use crate::error::{StorageError, ValidationError};
    use crate::view::{Dashboard, EmptyState, ListMode};

    /// Store whose writes always fail; used to exercise the degraded path.
    struct FailingStore {
        inner: MemoryStore,
        fail_reads: bool,
    }

    impl KeyValueStore for FailingStore {
        fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Backend(rusqlite::Error::InvalidQuery));
            }
            self.inner.read(slot)
        }

        fn write(&mut self, _slot: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend(rusqlite::Error::InvalidQuery))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn empty_repo() -> TransactionRepository {
        TransactionRepository::open(Box::new(MemoryStore::new())).unwrap()
    }

    fn lunch() -> NewTransaction {
        NewTransaction::new("Lunch", "20", "Food", "expense")
    }

    fn salary() -> NewTransaction {
        NewTransaction::new("Salary", "100", "Allowance", "income")
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut repo = empty_repo();

        let (first, p1) = repo.add_on(&lunch(), day("2024-01-05")).unwrap();
        let (second, p2) = repo.add_on(&salary(), day("2024-01-06")).unwrap();

        assert!(p1.is_durable() && p2.is_durable());
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.all()[0].id, first);
        assert_eq!(repo.all()[1].id, second);
    }

    #[test]
    fn test_add_defaults_to_today() {
        let mut repo = empty_repo();
        let (id, _) = repo.add(&lunch()).unwrap();

        assert_eq!(repo.get(id).unwrap().date, Local::now().date_naive());
    }

    #[test]
    fn test_invalid_add_leaves_list_unchanged() {
        let mut repo = empty_repo();
        repo.add_on(&lunch(), day("2024-01-05")).unwrap();

        for amount in ["-5", "abc"] {
            let bad = NewTransaction::new("Lunch", amount, "Food", "expense");
            let err = repo.add_on(&bad, day("2024-01-05")).unwrap_err();
            assert!(matches!(err, TrackerError::Validation(_)), "{amount}: {err}");
            assert_eq!(repo.len(), 1);
        }

        let err = repo
            .add_on(&NewTransaction::new("", "5", "Food", "expense"), day("2024-01-05"))
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Validation(ValidationError::EmptyDescription)
        ));
    }

    #[test]
    fn test_remove_at_bounds() {
        let mut repo = empty_repo();
        repo.add_on(&lunch(), day("2024-01-05")).unwrap();

        let err = repo.remove_at(1).unwrap_err();
        assert!(matches!(err, TrackerError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(repo.len(), 1);

        let (removed, _) = repo.remove_at(0).unwrap();
        assert_eq!(removed.description, "Lunch");
        assert!(repo.is_empty());

        let t = totals(repo.all());
        assert_eq!((t.income, t.expense, t.balance), (0.0, 0.0, 0.0));

        let dashboard = Dashboard::build(repo.all(), ListMode::Full);
        assert_eq!(dashboard.listing.empty, Some(EmptyState::NoTransactions));
    }

    #[test]
    fn test_remove_by_id_picks_the_right_duplicate() {
        let mut repo = empty_repo();
        let (first, _) = repo.add_on(&lunch(), day("2024-01-05")).unwrap();
        let (second, _) = repo.add_on(&lunch(), day("2024-01-05")).unwrap();

        // Value-identical records; removing the second must keep the first
        repo.remove(second).unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.all()[0].id, first);

        let err = repo.remove(second).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(id) if id == second));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_every_mutation_rewrites_store() {
        let mut repo = TransactionRepository::open(Box::new(SqliteStore::open_in_memory().unwrap())).unwrap();
        repo.add_on(&lunch(), day("2024-01-05")).unwrap();
        repo.add_on(&salary(), day("2024-01-05")).unwrap();
        repo.remove_at(0).unwrap();

        let stored = db::load_transactions(repo.store.as_ref()).unwrap();
        assert_eq!(stored.transactions, repo.all());
    }

    #[test]
    fn test_reopen_sees_previous_session() {
        let dir = std::env::temp_dir().join(format!("pocket-ledger-test-{}", TransactionId::new()));
        let path = dir.join("ledger.db");

        let saved_id = {
            let mut repo = TransactionRepository::open(Box::new(SqliteStore::open(&path).unwrap())).unwrap();
            repo.add_on(&salary(), day("2024-01-05")).unwrap().0
        };

        let repo = TransactionRepository::open(Box::new(SqliteStore::open(&path).unwrap())).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.all()[0].id, saved_id);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_write_failure_degrades_to_session_only() {
        let store = FailingStore {
            inner: MemoryStore::new(),
            fail_reads: false,
        };
        let mut repo = TransactionRepository::open(Box::new(store)).unwrap();

        let (id, persistence) = repo.add_on(&lunch(), day("2024-01-05")).unwrap();

        assert!(matches!(persistence, Persistence::SessionOnly(_)));
        // In-memory state is still valid
        assert_eq!(repo.get(id).unwrap().description, "Lunch");
    }

    #[test]
    fn test_unreadable_store_opens_session_only() {
        let store = FailingStore {
            inner: MemoryStore::new(),
            fail_reads: true,
        };
        assert!(matches!(
            TransactionRepository::open(Box::new(FailingStore {
                inner: MemoryStore::new(),
                fail_reads: true,
            })),
            Err(TrackerError::StorageUnavailable(_))
        ));

        let mut repo = TransactionRepository::open_or_session_only(Box::new(store));
        assert!(repo.is_empty());
        assert!(repo.storage_warning().is_some());

        let (_, persistence) = repo.add_on(&lunch(), day("2024-01-05")).unwrap();
        assert!(!persistence.is_durable());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_malformed_blob_is_not_overwritten() {
        let store = MemoryStore::with_slot(TRANSACTIONS_SLOT, "{definitely not a list");
        let mut repo = TransactionRepository::open_or_session_only(Box::new(store));

        repo.add_on(&lunch(), day("2024-01-05")).unwrap();

        let blob = repo.store.read(TRANSACTIONS_SLOT).unwrap().unwrap();
        assert_eq!(blob, "{definitely not a list");
    }

    #[test]
    fn test_import_skips_existing_and_invalid() {
        let mut repo = empty_repo();
        let (existing, _) = repo.add_on(&lunch(), day("2024-01-05")).unwrap();

        let mut bad = salary().validate(day("2024-01-06")).unwrap();
        bad.amount = -10.0;
        let records = vec![
            repo.get(existing).unwrap().clone(),
            salary().validate(day("2024-01-06")).unwrap(),
            bad,
        ];

        let report = repo.import(records);

        assert_eq!(report.imported, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.skipped_existing, 1);
        assert!(report.persistence.is_durable());
        assert_eq!(repo.len(), 2);
    }
}
