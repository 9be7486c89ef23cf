//! Signed-in session over one ledger.
//!
//! A `Session` only exists while an identity is present. It serializes ledger
//! mutations behind a mutex, recomputes totals on demand and runs advice
//! requests against snapshots without holding the ledger lock.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    Confirm, EngineError, Identity, IdentityProvider, IdentityStore, Language, Ledger,
    LedgerBuilder, Prompt, ResultEngine, Totals, Transaction, TransactionId, TransactionInput,
    advisory::{Advice, AdviceTracker, Advisor, AdvisoryRequest},
};

pub struct Session {
    identity: Identity,
    language: RwLock<Language>,
    ledger: Mutex<Ledger>,
    advisor: Arc<dyn Advisor>,
    tracker: AdviceTracker,
    advice: Mutex<Option<String>>,
    closed: AtomicBool,
}

impl Session {
    /// Opens a session for the identity currently known to `provider`.
    ///
    /// Without an identity nothing is loaded and [`EngineError::NotSignedIn`]
    /// is returned.
    pub fn open(
        provider: &dyn IdentityProvider,
        ledger: LedgerBuilder,
        advisor: Arc<dyn Advisor>,
        language: Language,
    ) -> ResultEngine<Self> {
        let identity = provider.current_identity().ok_or(EngineError::NotSignedIn)?;
        tracing::info!(user = %identity.id, "opening session");
        Ok(Self {
            identity,
            language: RwLock::new(language),
            ledger: Mutex::new(ledger.load()),
            advisor,
            tracker: AdviceTracker::new(),
            advice: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_language(&self, language: Language) {
        *self.language.write().unwrap_or_else(PoisonError::into_inner) = language;
    }

    /// Entries, most recent first.
    pub fn transactions(&self) -> ResultEngine<Vec<Transaction>> {
        self.ensure_open()?;
        Ok(self.ledger().snapshot())
    }

    pub fn totals(&self) -> ResultEngine<Totals> {
        self.ensure_open()?;
        Ok(self.ledger().totals())
    }

    /// Adds an entry. Any stored advice is dropped since it no longer
    /// describes the ledger.
    pub fn add(&self, input: TransactionInput) -> ResultEngine<Transaction> {
        self.ensure_open()?;
        let mut ledger = self.ledger();
        let result = ledger.add(input);
        if !matches!(result, Err(EngineError::Validation(_))) {
            self.invalidate_advice();
        }
        result
    }

    /// Deletes the entry with `id` if `confirm` agrees. Returns whether the
    /// deletion went ahead.
    pub fn delete(&self, id: &TransactionId, confirm: &dyn Confirm) -> ResultEngine<bool> {
        self.ensure_open()?;
        if !confirm.confirm(Prompt::DeleteEntry, self.language()) {
            return Ok(false);
        }
        let mut ledger = self.ledger();
        self.invalidate_advice();
        ledger.remove(id)?;
        Ok(true)
    }

    /// Asks the advisor about the current entries.
    ///
    /// The ledger stays usable while the request is in flight. If another
    /// request starts, the ledger changes or the session closes before the
    /// answer arrives, the answer is discarded and [`Advice::Superseded`] is
    /// returned.
    pub async fn request_advice(&self) -> ResultEngine<Advice> {
        self.ensure_open()?;
        let language = self.language();
        let (ticket, request) = {
            let ledger = self.ledger();
            if ledger.is_empty() {
                return Err(EngineError::Validation(
                    "no transactions to analyse".to_string(),
                ));
            }
            (
                self.tracker.begin(),
                AdvisoryRequest::new(ledger.snapshot(), language),
            )
        };

        tracing::debug!(
            advisor = self.advisor.name(),
            entries = request.transactions.len(),
            %language,
            "requesting advice"
        );
        let result = self.advisor.advise(&request).await;

        // Mutations and `close` invalidate under the ledger lock, so holding it
        // keeps the ticket current until the answer is cached.
        let _ledger = self.ledger();
        if !ticket.is_current() || self.is_closed() {
            tracing::debug!("discarding superseded advice");
            return Ok(Advice::Superseded);
        }

        match result {
            Ok(text) => {
                let text = text.trim().to_string();
                *self.advice.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.clone());
                Ok(Advice::Current(text))
            }
            Err(err) => {
                tracing::warn!(advisor = self.advisor.name(), "advice request failed: {err}");
                Err(EngineError::AdvisoryUnavailable(err.to_string()))
            }
        }
    }

    /// Last accepted advice, cleared by every ledger change.
    pub fn current_advice(&self) -> Option<String> {
        self.advice
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `true` while an advice request is outstanding.
    pub fn advice_pending(&self) -> bool {
        self.tracker.in_flight()
    }

    /// Ends the session. Requests in flight are discarded and every later
    /// call fails with [`EngineError::NotSignedIn`].
    pub fn close(&self) {
        let _ledger = self.ledger();
        self.closed.store(true, Ordering::SeqCst);
        self.invalidate_advice();
        tracing::info!(user = %self.identity.id, "session closed");
    }

    /// Signs out through `identities` if `confirm` agrees, closing the
    /// session. Returns whether the user was signed out.
    ///
    /// The session closes as soon as the identity is gone, even when clearing
    /// the stored identity fails and the error is returned.
    pub fn logout(&self, identities: &IdentityStore, confirm: &dyn Confirm) -> ResultEngine<bool> {
        let result = identities.sign_out(confirm, self.language());
        if identities.current_identity().is_none() {
            self.close();
        }
        result
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn invalidate_advice(&self) {
        self.tracker.supersede();
        self.advice
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> ResultEngine<()> {
        if self.is_closed() {
            return Err(EngineError::NotSignedIn);
        }
        Ok(())
    }
}
