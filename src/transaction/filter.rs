//! Pure derivations over the fetched transfer list.
//!
//! Everything in this module is recomputed per render from the latest
//! snapshot and the selected tag filter; nothing here mutates the source
//! list.

use std::collections::BTreeSet;

use super::model::Transaction;

/// The query value meaning "no filter selected".
pub const FILTER_ALL: &str = "all";

/// The tag filter selected on the transfers page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    /// Show every transfer.
    #[default]
    All,
    /// Show only transfers carrying a tag with this name.
    Tag(String),
}

impl TagFilter {
    /// Build a filter from the `tag` query parameter.
    ///
    /// A missing, empty, or [FILTER_ALL] value is the sentinel meaning
    /// "show all".
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            None => TagFilter::All,
            Some(name) if name.is_empty() || name == FILTER_ALL => TagFilter::All,
            Some(name) => TagFilter::Tag(name.to_string()),
        }
    }

    /// Whether `transaction` passes this filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Tag(name) => transaction.tags.iter().any(|tag| &tag.name == name),
        }
    }

    /// The value to put back into the `tag` query parameter.
    pub fn as_query_value(&self) -> &str {
        match self {
            TagFilter::All => FILTER_ALL,
            TagFilter::Tag(name) => name,
        }
    }
}

/// The distinct tag names present across `transactions`, sorted for stable
/// display.
pub fn distinct_tag_names(transactions: &[Transaction]) -> Vec<String> {
    let names: BTreeSet<&str> = transactions
        .iter()
        .flat_map(|transaction| transaction.tags.iter().map(|tag| tag.name.as_str()))
        .collect();

    names.into_iter().map(str::to_string).collect()
}

/// The subsequence of `transactions` passing `filter`.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TagFilter,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}

/// The signed running total over `transactions`: income adds, expenses
/// subtract.
///
/// Accumulates in floating point; the result is for display formatting
/// only and is never written back into a stored amount.
pub fn signed_total<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> f64 {
    transactions
        .into_iter()
        .fold(0.0, |total, transaction| {
            total + transaction.kind.signed(transaction.amount.value())
        })
}

/// The "Showing {shown} of {total}" counts under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSummary {
    /// How many transfers passed the filter.
    pub shown: usize,
    /// How many transfers were fetched in total.
    pub total: usize,
}

impl ListSummary {
    /// Count the filtered subsequence against the full list.
    pub fn new(filtered: &[&Transaction], all: &[Transaction]) -> Self {
        Self {
            shown: filtered.len(),
            total: all.len(),
        }
    }
}

#[cfg(test)]
mod filter_tests {
    use time::macros::date;

    use crate::transaction::model::{Amount, Tag, Transaction, TransactionKind};

    use super::{
        FILTER_ALL, ListSummary, TagFilter, distinct_tag_names, filter_transactions, signed_total,
    };

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
        }
    }

    fn transaction(id: i64, amount: &str, kind: TransactionKind, tags: Vec<Tag>) -> Transaction {
        Transaction {
            id,
            description: format!("transfer {id}"),
            amount: Amount::parse(amount).unwrap(),
            kind,
            date: date!(2025 - 07 - 14),
            tags,
        }
    }

    fn sample_list() -> Vec<Transaction> {
        vec![
            transaction(
                1,
                "50.00",
                TransactionKind::Income,
                vec![tag(1, "salary"), tag(2, "monthly")],
            ),
            transaction(2, "20.00", TransactionKind::Expense, vec![tag(3, "food")]),
            transaction(3, "5.50", TransactionKind::Expense, vec![]),
        ]
    }

    #[test]
    fn sentinel_filter_keeps_everything() {
        let list = sample_list();

        let filtered = filter_transactions(&list, &TagFilter::All);

        assert_eq!(filtered.len(), list.len());
        for (filtered, original) in filtered.iter().zip(list.iter()) {
            assert_eq!(*filtered, original);
        }
    }

    #[test]
    fn filtered_list_is_never_longer() {
        let list = sample_list();
        let filters = [
            TagFilter::All,
            TagFilter::Tag("salary".to_string()),
            TagFilter::Tag("food".to_string()),
            TagFilter::Tag("no such tag".to_string()),
        ];

        for filter in filters {
            assert!(filter_transactions(&list, &filter).len() <= list.len());
        }
    }

    #[test]
    fn filter_partitions_by_tag_name() {
        let list = sample_list();
        let filter = TagFilter::Tag("food".to_string());

        let filtered = filter_transactions(&list, &filter);

        for transaction in &filtered {
            assert!(transaction.tags.iter().any(|tag| tag.name == "food"));
        }

        let kept_ids: Vec<i64> = filtered.iter().map(|transaction| transaction.id).collect();
        for transaction in list.iter().filter(|t| !kept_ids.contains(&t.id)) {
            assert!(!transaction.tags.iter().any(|tag| tag.name == "food"));
        }
    }

    #[test]
    fn from_query_treats_missing_empty_and_all_as_sentinel() {
        assert_eq!(TagFilter::from_query(None), TagFilter::All);
        assert_eq!(TagFilter::from_query(Some("")), TagFilter::All);
        assert_eq!(TagFilter::from_query(Some(FILTER_ALL)), TagFilter::All);
        assert_eq!(
            TagFilter::from_query(Some("food")),
            TagFilter::Tag("food".to_string())
        );
    }

    #[test]
    fn distinct_names_collapse_duplicates() {
        let list = vec![
            transaction(1, "1.00", TransactionKind::Income, vec![tag(1, "salary")]),
            transaction(
                2,
                "2.00",
                TransactionKind::Expense,
                vec![tag(1, "salary"), tag(3, "food")],
            ),
        ];

        let names = distinct_tag_names(&list);

        assert_eq!(names, vec!["food".to_string(), "salary".to_string()]);
    }

    #[test]
    fn signed_total_credits_income_and_debits_expenses() {
        let list = sample_list();

        let total = signed_total(filter_transactions(&list, &TagFilter::All));

        assert_eq!(total, 50.0 - 20.0 - 5.5);
    }

    #[test]
    fn signed_total_matches_example_scenario() {
        let list = vec![
            transaction(1, "50.00", TransactionKind::Income, vec![]),
            transaction(2, "20.00", TransactionKind::Expense, vec![]),
        ];

        assert_eq!(signed_total(&list), 30.0);
    }

    #[test]
    fn signed_total_is_order_independent() {
        let mut list = sample_list();
        let want = signed_total(&list);

        list.reverse();
        assert_eq!(signed_total(&list), want);

        list.swap(0, 1);
        assert_eq!(signed_total(&list), want);
    }

    #[test]
    fn empty_list_summary_is_zero_of_zero() {
        let list: Vec<Transaction> = Vec::new();

        let filtered = filter_transactions(&list, &TagFilter::All);
        let summary = ListSummary::new(&filtered, &list);

        assert_eq!(summary, ListSummary { shown: 0, total: 0 });
        assert_eq!(signed_total(filtered), 0.0);
    }
}
