//! Personal khata: a ledger of money to receive and money to pay.
//!
//! - [`Ledger`] stores the entries, newest first, and persists them through a
//!   [`Storage`] after every change.
//! - [`summarize`] derives receivable/payable [`Totals`] from the entries.
//! - [`Advisor`] is the port to a text-generation service that writes a short
//!   summary of the ledger.
//! - [`Session`] gates all of the above behind a signed-in [`Identity`].

pub use advisory::{
    Advice, AdviceTicket, AdviceTracker, Advisor, AdvisoryError, AdvisoryRequest,
};
pub use confirm::{AlwaysConfirm, Confirm, Prompt};
pub use error::EngineError;
pub use identity::{Identity, IdentityProvider, IdentityStore};
pub use language::{Label, Language};
pub use ledger::{Ledger, LedgerBuilder};
pub use money::Money;
pub use session::Session;
pub use settings::{AdvisorSettings, Settings};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use totals::{Totals, summarize};
pub use transactions::{Transaction, TransactionId, TransactionInput, TransactionType};

pub mod advisory;
mod confirm;
mod error;
mod identity;
mod language;
mod ledger;
pub mod logging;
mod money;
mod session;
pub mod settings;
pub mod storage;
mod totals;
mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;
