//! Totals derived from the ledger.
//!
//! Totals are recomputed from the entries every time they are asked for and
//! are never stored.

use serde::Serialize;

use crate::{Money, Transaction, TransactionType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Sum of receivable amounts.
    pub receive: Money,
    /// Sum of payable amounts.
    pub pay: Money,
}

impl Totals {
    /// Net balance: what the user gets back once everyone is settled.
    #[must_use]
    pub fn net(&self) -> Money {
        self.receive.saturating_sub(self.pay)
    }
}

/// Sums receivable and payable amounts of `transactions`.
///
/// Each total saturates instead of overflowing.
pub fn summarize(transactions: &[Transaction]) -> Totals {
    transactions
        .iter()
        .fold(Totals::default(), |mut acc, tx| {
            match tx.kind {
                TransactionType::Receivable => acc.receive = acc.receive.saturating_add(tx.amount),
                TransactionType::Payable => acc.pay = acc.pay.saturating_add(tx.amount),
            }
            acc
        })
}
