//! The transaction store.
//!
//! `Ledger` owns the entries, newest first, and mirrors the whole collection
//! into a [`Storage`] after every mutation.

use std::{collections::HashSet, fmt, sync::Arc};

use crate::{
    ResultEngine, Totals, Transaction, TransactionId, TransactionInput,
    storage::{MemoryStorage, Storage, TRANSACTIONS_KEY},
    totals::summarize,
};

pub struct Ledger {
    transactions: Vec<Transaction>,
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.transactions)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to load the store.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Entries, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Owned copy of the entries, detached from later mutations.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| &tx.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Totals of the current entries, recomputed on every call.
    pub fn totals(&self) -> Totals {
        summarize(&self.transactions)
    }

    /// Validates `input`, stores it in front of the older entries and
    /// persists the collection.
    ///
    /// On a storage failure the entry stays in memory and the error is
    /// returned; the next mutation writes it again.
    pub fn add(&mut self, input: TransactionInput) -> ResultEngine<Transaction> {
        let tx = Transaction::from_input(TransactionId::generate(), input)?;
        self.transactions.insert(0, tx.clone());
        tracing::debug!(id = %tx.id, kind = tx.kind.as_str(), "transaction added");
        self.persist()?;
        Ok(tx)
    }

    /// Removes the entry with `id` if present and persists the collection.
    ///
    /// Removing an unknown id leaves the entries as they are.
    pub fn remove(&mut self, id: &TransactionId) -> ResultEngine<&[Transaction]> {
        let before = self.transactions.len();
        self.transactions.retain(|tx| &tx.id != id);
        if self.transactions.len() == before {
            tracing::debug!(%id, "remove of unknown transaction");
        }
        self.persist()?;
        Ok(&self.transactions)
    }

    /// Writes the whole collection under the transactions key, replacing the
    /// previous value.
    pub fn persist(&self) -> ResultEngine<()> {
        let payload = serde_json::to_string(&self.transactions)
            .map_err(crate::storage::StorageError::from)?;
        self.storage
            .set(TRANSACTIONS_KEY, &payload)
            .inspect_err(|err| tracing::error!("failed to persist transactions: {err}"))?;
        Ok(())
    }
}

fn usable_rows(rows: Vec<serde_json::Value>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let tx = match serde_json::from_value::<Transaction>(row) {
            Ok(tx) => tx,
            Err(err) => {
                tracing::warn!(index, "skipping unreadable stored transaction: {err}");
                continue;
            }
        };
        if let Err(err) = tx.validate() {
            tracing::warn!(index, id = %tx.id, "skipping invalid stored transaction: {err}");
            continue;
        }
        if !seen.insert(tx.id.clone()) {
            tracing::warn!(index, id = %tx.id, "skipping stored transaction with repeated id");
            continue;
        }
        transactions.push(tx);
    }
    transactions
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    storage: Option<Arc<dyn Storage>>,
    seed: Vec<Transaction>,
}

impl LedgerBuilder {
    /// Pass the storage the ledger reads from and writes to. Defaults to a
    /// fresh [`MemoryStorage`].
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> LedgerBuilder {
        self.storage = Some(storage);
        self
    }

    /// Entries used when nothing usable is stored yet.
    pub fn seed(mut self, seed: Vec<Transaction>) -> LedgerBuilder {
        self.seed = seed;
        self
    }

    /// Restore the ledger from storage.
    ///
    /// Never fails: a missing, unreadable or malformed value falls back to
    /// the seed. Rows that `add` would have refused and repeated ids are
    /// dropped, the first occurrence of an id wins.
    pub fn load(self) -> Ledger {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));

        let transactions = match storage.get(TRANSACTIONS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(rows) => usable_rows(rows),
                Err(err) => {
                    tracing::warn!("stored transactions are malformed, using defaults: {err}");
                    self.seed
                }
            },
            Ok(None) => self.seed,
            Err(err) => {
                tracing::warn!("failed to read stored transactions, using defaults: {err}");
                self.seed
            }
        };

        tracing::info!(count = transactions.len(), "ledger loaded");
        Ledger {
            transactions,
            storage,
        }
    }
}
