//! Advisory port: narrative summaries of the ledger from a text-generation
//! service.
//!
//! Adapters implement [`Advisor`]. Callers build an [`AdvisoryRequest`] from
//! a snapshot of the ledger, so later mutations never leak into a request in
//! flight, and use an [`AdviceTracker`] to drop responses that arrive after
//! a newer request or a ledger change.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::{Language, Totals, Transaction, totals::summarize};

/// Failure of an advisory adapter. Callers outside the adapter only see it
/// as "advisory unavailable".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdvisoryError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response contained no text")]
    Empty,
}

/// Client for a text-generation service that writes ledger summaries.
///
/// Implementations are stateless per request and must not retry.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Returns a short narrative about `request`, phrased in its language.
    async fn advise(&self, request: &AdvisoryRequest) -> Result<String, AdvisoryError>;
}

/// Everything an advisor gets to see: a copy of the entries at request time
/// and the language to answer in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdvisoryRequest {
    pub language: Language,
    pub transactions: Vec<Transaction>,
}

impl AdvisoryRequest {
    pub fn new(transactions: Vec<Transaction>, language: Language) -> Self {
        Self {
            language,
            transactions,
        }
    }

    pub fn totals(&self) -> Totals {
        summarize(&self.transactions)
    }

    /// Renders the prompt text. The same request always renders the same text.
    pub fn prompt(&self) -> String {
        let totals = self.totals();
        let entries = serde_json::to_string_pretty(&self.transactions)
            .unwrap_or_else(|_| "[]".to_string());
        let instruction = match self.language {
            Language::En => "Reply in simple English.",
            Language::Ru => "Reply in Roman Urdu (Urdu written with English letters).",
        };

        format!(
            "You are a friendly bookkeeping assistant for a personal khata (ledger) \
             that tracks money to receive (RECEIVABLE) and money to pay (PAYABLE).\n\
             Summarize the user's financial position in 3-4 short sentences, name the \
             biggest balances, and give one practical suggestion. Do not invent entries.\n\
             {instruction}\n\n\
             Total to receive: {receive}\n\
             Total to pay: {pay}\n\
             Net balance: {net}\n\n\
             Transactions, newest first (amount is in rupees):\n\
             {entries}\n",
            receive = totals.receive,
            pay = totals.pay,
            net = totals.net(),
        )
    }
}

/// Outcome of an advice request that completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advice {
    /// Answer to the newest request, computed against the current entries.
    Current(String),
    /// A newer request or a ledger change happened while this one was in
    /// flight; the answer was discarded.
    Superseded,
}

/// Orders advice requests so only the newest answer is applied.
#[derive(Debug, Default)]
pub struct AdviceTracker {
    latest: AtomicU64,
    in_flight: AtomicUsize,
}

impl AdviceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request. Every earlier ticket stops being current.
    pub fn begin(&self) -> AdviceTicket<'_> {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        AdviceTicket { id, tracker: self }
    }

    /// Invalidates every outstanding ticket without starting a request.
    pub fn supersede(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// `true` while at least one ticket is alive.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

/// Handle of one advice request. Dropping it (also by abandoning the future
/// that holds it) ends the request.
#[derive(Debug)]
pub struct AdviceTicket<'a> {
    id: u64,
    tracker: &'a AdviceTracker,
}

impl AdviceTicket<'_> {
    pub fn is_current(&self) -> bool {
        self.tracker.latest.load(Ordering::SeqCst) == self.id
    }
}

impl Drop for AdviceTicket<'_> {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Money, TransactionId, TransactionInput};

    fn entries() -> Vec<Transaction> {
        vec![
            Transaction::from_input(
                TransactionId::from("b"),
                TransactionInput::payable("Sara", Money::rupees(200)).date("2024-03-02"),
            )
            .unwrap(),
            Transaction::from_input(
                TransactionId::from("a"),
                TransactionInput::receivable("Ali", Money::rupees(500)).date("2024-03-01"),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn prompt_carries_totals_and_entries() {
        let prompt = AdvisoryRequest::new(entries(), Language::En).prompt();
        assert!(prompt.contains("Total to receive: Rs. 500"));
        assert!(prompt.contains("Total to pay: Rs. 200"));
        assert!(prompt.contains("Net balance: Rs. 300"));
        assert!(prompt.contains("\"contactName\": \"Sara\""));
        assert!(prompt.contains("Reply in simple English."));
    }

    #[test]
    fn language_only_changes_the_instruction() {
        let en = AdvisoryRequest::new(entries(), Language::En).prompt();
        let ru = AdvisoryRequest::new(entries(), Language::Ru).prompt();
        assert!(ru.contains("Roman Urdu"));
        assert_eq!(
            en.replace("Reply in simple English.", ""),
            ru.replace("Reply in Roman Urdu (Urdu written with English letters).", "")
        );
        assert_eq!(
            AdvisoryRequest::new(entries(), Language::Ru).prompt(),
            ru
        );
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let tracker = AdviceTracker::new();
        let first = tracker.begin();
        assert!(first.is_current());
        let second = tracker.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        tracker.supersede();
        assert!(!second.is_current());
    }

    #[test]
    fn dropped_tickets_end_the_request() {
        let tracker = AdviceTracker::new();
        assert!(!tracker.in_flight());
        let ticket = tracker.begin();
        assert!(tracker.in_flight());
        drop(ticket);
        assert!(!tracker.in_flight());
    }
}
