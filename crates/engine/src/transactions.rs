//! Ledger entries.
//!
//! A `Transaction` records one amount either owed to the user
//! ([`TransactionType::Receivable`]) or owed by the user
//! ([`TransactionType::Payable`]). Entries are created from a
//! [`TransactionInput`] and never change afterwards.

use std::{fmt, str::FromStr};

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Opaque identifier of a ledger entry.
///
/// New ids are random UUIDs in simple form; ids read back from storage are
/// kept verbatim, whatever their shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Direction of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money owed to the user ("lena hai").
    Receivable,
    /// Money the user owes ("dena hai").
    Payable,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Receivable => "RECEIVABLE",
            Self::Payable => "PAYABLE",
        }
    }

    /// Short badge shown next to an entry. The same in every language.
    pub fn label(self) -> &'static str {
        match self {
            Self::Receivable => "Lena Hai",
            Self::Payable => "Dena Hai",
        }
    }
}

impl FromStr for TransactionType {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RECEIVABLE" => Ok(Self::Receivable),
            "PAYABLE" => Ok(Self::Payable),
            other => Err(EngineError::Validation(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub contact_name: String,
    /// Stored as a rupee number (`500`, `10.5`).
    #[serde(with = "crate::money::rupees")]
    pub amount: Money,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    /// Validates `input` and attaches `id` to it.
    pub(crate) fn from_input(id: TransactionId, input: TransactionInput) -> ResultEngine<Self> {
        let contact_name = normalize_display(&input.contact_name).ok_or_else(|| {
            EngineError::Validation("contact name must not be empty".to_string())
        })?;
        check_amount(input.amount)?;
        let date = normalize_optional_text(input.date.as_deref()).unwrap_or_else(today);

        Ok(Self {
            id,
            contact_name,
            amount: input.amount,
            date,
            note: normalize_optional_text(input.note.as_deref()),
            kind: input.kind,
        })
    }

    /// Checks an entry read back from storage against the rules enforced by
    /// [`Ledger::add`](crate::Ledger::add).
    pub fn validate(&self) -> ResultEngine<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(EngineError::Validation("id must not be empty".to_string()));
        }
        if self.contact_name.trim().is_empty() {
            return Err(EngineError::Validation(
                "contact name must not be empty".to_string(),
            ));
        }
        check_amount(self.amount)
    }

    /// Amount with the sign of its effect on the net balance.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionType::Receivable => self.amount,
            TransactionType::Payable => -self.amount,
        }
    }
}

/// Id-less input for [`Ledger::add`](crate::Ledger::add).
///
/// Nothing is checked until the ledger accepts it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    pub contact_name: String,
    pub amount: Money,
    pub kind: TransactionType,
    pub date: Option<String>,
    pub note: Option<String>,
}

impl TransactionInput {
    #[must_use]
    pub fn new(kind: TransactionType, contact_name: impl Into<String>, amount: Money) -> Self {
        Self {
            contact_name: contact_name.into(),
            amount,
            kind,
            date: None,
            note: None,
        }
    }

    #[must_use]
    pub fn receivable(contact_name: impl Into<String>, amount: Money) -> Self {
        Self::new(TransactionType::Receivable, contact_name, amount)
    }

    #[must_use]
    pub fn payable(contact_name: impl Into<String>, amount: Money) -> Self {
        Self::new(TransactionType::Payable, contact_name, amount)
    }

    /// Builds an input from raw form fields, parsing the type tag and the
    /// rupee amount.
    pub fn from_form(kind: &str, contact_name: &str, amount: &str) -> ResultEngine<Self> {
        Ok(Self::new(kind.parse()?, contact_name, amount.parse()?))
    }

    #[must_use]
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

fn check_amount(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    if amount > Money::MAX_ENTRY {
        return Err(EngineError::Validation(format!(
            "amount must be at most {}, got {amount}",
            Money::MAX_ENTRY
        )));
    }
    Ok(())
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn normalize_display(input: &str) -> Option<String> {
    let joined = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}
