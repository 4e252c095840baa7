//! Account-related types for the bank ledger
//!
//! Accounts only carry identity. Balances are never stored on the account;
//! they are derived from the ledger on demand and reported through
//! [`AccountBalance`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier, assigned by storage starting at 1
pub type AccountId = u64;

/// A bank account
///
/// Created once through the account store and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Storage-assigned identifier
    pub id: AccountId,

    /// Free-text name of the account holder
    pub holder_name: String,

    /// Globally unique account number
    pub account_number: String,
}

/// Search predicate over accounts
///
/// `name` is a case-insensitive substring match on the holder name, `number`
/// an exact match
/// on the account number. When both are set both must hold. A filter with
/// neither set matches every account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl AccountFilter {
    /// Filter matching every account
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.name.is_none() && self.number.is_none()
    }

    pub fn matches(&self, account: &Account) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .is_none_or(|name| {
                account
                    .holder_name
                    .to_lowercase()
                    .contains(&name.to_lowercase())
            });
        let number_ok = self
            .number
            .as_deref()
            .is_none_or(|number| account.account_number == number);
        name_ok && number_ok
    }
}

/// Balance report for a single account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    pub account: Account,

    /// Sum of credits minus sum of debits at the time of the read
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn alice() -> Account {
        Account {
            id: 1,
            holder_name: "Alice Liddell".to_string(),
            account_number: "1001".to_string(),
        }
    }

    #[rstest]
    #[case::unbounded(None, None, true)]
    #[case::name_substring(Some("Lid"), None, true)]
    #[case::name_miss(Some("Bob"), None, false)]
    #[case::name_ignores_case(Some("alice"), None, true)]
    #[case::name_upper_case(Some("LIDDELL"), None, true)]
    #[case::name_keeps_spaces(Some("Alice "), None, true)]
    #[case::name_trailing_space_misses(Some("Liddell "), None, false)]
    #[case::number_exact(None, Some("1001"), true)]
    #[case::number_prefix_is_not_enough(None, Some("100"), false)]
    #[case::both_match(Some("Alice"), Some("1001"), true)]
    #[case::both_needed(Some("Alice"), Some("2002"), false)]
    fn test_filter_matches(
        #[case] name: Option<&str>,
        #[case] number: Option<&str>,
        #[case] expected: bool,
    ) {
        let filter = AccountFilter {
            name: name.map(str::to_string),
            number: number.map(str::to_string),
        };
        assert_eq!(filter.matches(&alice()), expected);
    }

    #[test]
    fn test_all_filter_is_unbounded() {
        assert!(AccountFilter::all().is_unbounded());
        assert!(!AccountFilter {
            name: Some("a".to_string()),
            number: None
        }
        .is_unbounded());
    }
}
