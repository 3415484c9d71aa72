//! Core domain types for transfers.
//!
//! The remote API speaks Portuguese field names and transmits amounts as
//! decimal strings; the types here are the parsed, validated counterparts
//! used by the rest of the application. Wire DTOs live in [crate::api].

use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// Identifier for a transfer, assigned by the remote API.
pub type TransactionId = i64;

/// Identifier for a tag, assigned by the remote API.
pub type TagId = i64;

/// A label attachable to multiple transfers, globally defined.
///
/// Tags are immutable from this application's perspective: they are only
/// ever fetched and referenced by id, never created or deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Tag {
    /// The ID of the tag.
    pub id: TagId,
    /// The display name of the tag.
    pub name: String,
}

/// Whether a transfer spends or earns money.
///
/// These are the only two values the remote API accepts; serde rejects any
/// other wire value before it can reach a mutation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money spent. Subtracts from totals.
    #[serde(rename = "DESPESA")]
    Expense,
    /// Money earned. Adds to totals.
    #[serde(rename = "RECEITA")]
    Income,
}

impl TransactionKind {
    /// The value used in form controls and on the wire.
    pub fn wire_value(self) -> &'static str {
        match self {
            TransactionKind::Expense => "DESPESA",
            TransactionKind::Income => "RECEITA",
        }
    }

    /// Apply the sign convention to `value`: income counts up, expenses
    /// count down.
    pub fn signed(self, value: f64) -> f64 {
        match self {
            TransactionKind::Expense => -value,
            TransactionKind::Income => value,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
        };
        write!(f, "{label}")
    }
}

/// A monetary amount as transmitted by the remote API: a decimal string.
///
/// The original text is kept so that update submissions round-trip the
/// value byte-for-byte; the parsed number is only used for totals and
/// display formatting and is never written back to the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Amount {
    text: String,
    value: f64,
}

impl Amount {
    /// Parse a decimal string into an [Amount].
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `text` does not parse to a finite,
    /// non-negative number.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let trimmed = text.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| Error::InvalidAmount(text.to_string()))?;

        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidAmount(text.to_string()));
        }

        Ok(Self {
            text: trimmed.to_string(),
            value,
        })
    }

    /// The amount exactly as it appeared on the wire.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed numeric value, for totals and display only.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether the amount is strictly greater than zero.
    ///
    /// Creation and editing reject non-positive amounts.
    pub fn is_positive(&self) -> bool {
        self.value > 0.0
    }
}

impl TryFrom<String> for Amount {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Amount::parse(&value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// A single income or expense record belonging to the logged-in user.
///
/// Instances only ever come from the remote API via
/// [crate::api::fetch_transactions]; the application never mutates one
/// locally. Changes become visible after the next full reload.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transfer.
    pub id: TransactionId,
    /// A text description of what the transfer was for.
    pub description: String,
    /// The amount of money spent or earned in this transfer.
    pub amount: Amount,
    /// Whether the transfer is an expense or income.
    pub kind: TransactionKind,
    /// When the transfer happened.
    pub date: Date,
    /// The tags attached to this transfer, deduplicated by id.
    pub tags: Vec<Tag>,
}

/// A validated draft of a transfer, ready to be submitted to the remote API.
///
/// Drafts exist only while a form is open: one is produced from the raw
/// form data by [crate::transaction::TransactionFormData::validate] and
/// discarded once the submission settles, whatever the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// The trimmed, non-empty description.
    pub description: String,
    /// The selected kind.
    pub kind: TransactionKind,
    /// The amount, guaranteed to parse to a positive number.
    pub amount: Amount,
    /// The date the transfer happened.
    pub date: Date,
    /// The selected tag ids, deduplicated.
    pub tag_ids: Vec<TagId>,
}

/// Date format used by the remote API, e.g. "2025-07-14".
const WIRE_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a transaction date from the remote API.
///
/// The API sends plain ISO-8601 dates for manually created transfers and
/// full date-times for edited ones, so only the leading date portion is
/// significant.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if the string does not start with an
/// ISO-8601 date.
pub(crate) fn parse_wire_date(text: &str) -> Result<Date, Error> {
    let date_part = text.get(..10).unwrap_or(text);

    Date::parse(date_part, WIRE_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod amount_tests {
    use crate::Error;

    use super::Amount;

    #[test]
    fn parses_decimal_string() {
        let amount = Amount::parse("100.50").unwrap();

        assert_eq!(amount.text(), "100.50");
        assert_eq!(amount.value(), 100.5);
        assert!(amount.is_positive());
    }

    #[test]
    fn keeps_original_text() {
        let amount = Amount::parse("7.10").unwrap();

        // "7.10" must not be normalised to "7.1": updates send the text back.
        assert_eq!(amount.text(), "7.10");
    }

    #[test]
    fn zero_is_valid_but_not_positive() {
        let amount = Amount::parse("0").unwrap();

        assert!(!amount.is_positive());
    }

    #[test]
    fn rejects_garbage() {
        let result = Amount::parse("ten dollars");

        assert_eq!(result, Err(Error::InvalidAmount("ten dollars".to_string())));
    }

    #[test]
    fn rejects_negative() {
        let result = Amount::parse("-5.00");

        assert_eq!(result, Err(Error::InvalidAmount("-5.00".to_string())));
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Amount::parse("NaN").is_err());
        assert!(Amount::parse("inf").is_err());
    }

    #[test]
    fn deserializes_from_json_string() {
        let amount: Amount = serde_json::from_str("\"42.00\"").unwrap();

        assert_eq!(amount.value(), 42.0);
    }

    #[test]
    fn serializes_to_original_text() {
        let amount = Amount::parse("19.90").unwrap();

        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"19.90\"");
    }
}


#[cfg(test)]
mod kind_tests {
    use super::TransactionKind;

    #[test]
    fn wire_values_round_trip_through_serde() {
        let income: TransactionKind = serde_json::from_str("\"RECEITA\"").unwrap();
        let expense: TransactionKind = serde_json::from_str("\"DESPESA\"").unwrap();

        assert_eq!(income, TransactionKind::Income);
        assert_eq!(expense, TransactionKind::Expense);
        assert_eq!(serde_json::to_string(&income).unwrap(), "\"RECEITA\"");
    }

    #[test]
    fn rejects_unknown_kind() {
        let result: Result<TransactionKind, _> = serde_json::from_str("\"TRANSFERENCIA\"");

        assert!(result.is_err());
    }

    #[test]
    fn sign_convention() {
        assert_eq!(TransactionKind::Income.signed(10.0), 10.0);
        assert_eq!(TransactionKind::Expense.signed(10.0), -10.0);
    }
}
