//! Account classification state for one session
//!
//! The account list captured at login is immutable for the life of the
//! session. The visible view and both defaults are stored as indices into it,
//! and are always recomputed from the full list, never patched.

use crate::models::{Account, AccountKind, AccountTypeFilter};

use super::report::AccountTypeCounts;

/// Per-kind default account indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Defaults {
    pub equities: Option<usize>,
    pub derivatives: Option<usize>,
}

impl Defaults {
    pub fn get(&self, kind: AccountKind) -> Option<usize> {
        match kind {
            AccountKind::Equities => self.equities,
            AccountKind::Derivatives => self.derivatives,
        }
    }

    fn slot(&mut self, kind: AccountKind) -> &mut Option<usize> {
        match kind {
            AccountKind::Equities => &mut self.equities,
            AccountKind::Derivatives => &mut self.derivatives,
        }
    }
}

/// Indices of the accounts that pass `filter`, in login order
pub fn filter_indices(accounts: &[Account], filter: AccountTypeFilter) -> Vec<usize> {
    accounts
        .iter()
        .enumerate()
        .filter(|(_, account)| filter.matches(account))
        .map(|(i, _)| i)
        .collect()
}

/// First signed account of each kind, in login order
pub fn compute_defaults(accounts: &[Account]) -> Defaults {
    let mut defaults = Defaults::default();
    for (i, account) in accounts.iter().enumerate() {
        if !account.signed {
            continue;
        }
        let slot = defaults.slot(account.kind);
        if slot.is_none() {
            *slot = Some(i);
        }
    }
    defaults
}

/// Why a filter switch was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRejection {
    NotAuthenticated,
    NoMatchingAccounts,
}

/// Account state of one session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    authenticated: bool,
    all_accounts: Vec<Account>,
    visible: Vec<usize>,
    filter: AccountTypeFilter,
    defaults: Defaults,
}

impl SessionState {
    /// The logged-out state
    pub fn new() -> Self {
        Self::default()
    }

    /// State after a successful login returning `accounts`
    pub fn authenticated(accounts: Vec<Account>, filter: AccountTypeFilter) -> Self {
        let visible = filter_indices(&accounts, filter);
        let defaults = compute_defaults(&accounts);
        Self {
            authenticated: true,
            all_accounts: accounts,
            visible,
            filter,
            defaults,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn filter(&self) -> AccountTypeFilter {
        self.filter
    }

    pub fn all_accounts(&self) -> &[Account] {
        &self.all_accounts
    }

    pub fn visible_accounts(&self) -> Vec<&Account> {
        self.visible.iter().map(|&i| &self.all_accounts[i]).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.contains(&index)
    }

    pub fn defaults(&self) -> Defaults {
        self.defaults
    }

    pub fn default_account(&self, kind: AccountKind) -> Option<&Account> {
        self.defaults.get(kind).map(|i| &self.all_accounts[i])
    }

    /// Whether the account at `index` is the default for its kind
    pub fn is_default(&self, index: usize) -> bool {
        self.all_accounts
            .get(index)
            .map_or(false, |a| self.defaults.get(a.kind) == Some(index))
    }

    pub fn counts(&self) -> AccountTypeCounts {
        let equities = self
            .all_accounts
            .iter()
            .filter(|a| a.kind == AccountKind::Equities)
            .count();
        AccountTypeCounts {
            equities,
            derivatives: self.all_accounts.len() - equities,
            total: self.all_accounts.len(),
        }
    }

    /// Re-filter the full account list
    ///
    /// Leaves the state untouched when the switch is refused. Returns the new
    /// visible count on success.
    pub fn apply_filter(&mut self, filter: AccountTypeFilter) -> Result<usize, SwitchRejection> {
        if !self.authenticated {
            return Err(SwitchRejection::NotAuthenticated);
        }

        let visible = filter_indices(&self.all_accounts, filter);
        if visible.is_empty() && filter != AccountTypeFilter::All {
            return Err(SwitchRejection::NoMatchingAccounts);
        }

        self.visible = visible;
        self.filter = filter;
        self.defaults = compute_defaults(&self.all_accounts);
        Ok(self.visible.len())
    }

    /// Index of the account with this kind, broker and number
    pub fn position(&self, kind: AccountKind, broker_id: &str, account_id: &str) -> Option<usize> {
        self.all_accounts.iter().position(|a| {
            a.kind == kind && a.broker_id == broker_id && a.account_id == account_id
        })
    }

    /// Make the account at `index` the default for its kind
    ///
    /// Only signed accounts are eligible. Returns the account's kind.
    pub fn set_default(&mut self, index: usize) -> Option<AccountKind> {
        let account = self.all_accounts.get(index)?;
        if !account.signed {
            return None;
        }
        let kind = account.kind;
        *self.defaults.slot(kind) = Some(index);
        Some(kind)
    }

    /// Return to the logged-out state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(id: &str, signed: bool) -> Account {
        Account::new(AccountKind::Equities, "A1", "9A95", id).with_signed(signed)
    }

    fn fo(id: &str, signed: bool) -> Account {
        Account::new(AccountKind::Derivatives, "A1", "F002", id).with_signed(signed)
    }

    fn ids(accounts: Vec<&Account>) -> Vec<&str> {
        accounts.into_iter().map(|a| a.account_id.as_str()).collect()
    }

    #[test]
    fn test_logged_out_state_is_empty() {
        let state = SessionState::new();
        assert!(!state.is_authenticated());
        assert!(state.all_accounts().is_empty());
        assert!(state.visible_accounts().is_empty());
        assert_eq!(state.defaults(), Defaults::default());
        assert_eq!(state.counts(), AccountTypeCounts::default());
    }

    #[test]
    fn test_filter_preserves_order() {
        let accounts = vec![eq("S1", true), fo("F1", true), eq("S2", false), fo("F2", false)];
        assert_eq!(filter_indices(&accounts, AccountTypeFilter::All), vec![0, 1, 2, 3]);
        assert_eq!(filter_indices(&accounts, AccountTypeFilter::EquitiesOnly), vec![0, 2]);
        assert_eq!(filter_indices(&accounts, AccountTypeFilter::DerivativesOnly), vec![1, 3]);
    }

    #[test]
    fn test_unsigned_never_default() {
        let defaults = compute_defaults(&[eq("A", false), eq("B", true)]);
        assert_eq!(defaults.equities, Some(1));
        assert_eq!(defaults.derivatives, None);

        let defaults = compute_defaults(&[fo("only", false)]);
        assert_eq!(defaults.derivatives, None);
    }

    #[test]
    fn test_first_signed_wins() {
        let defaults = compute_defaults(&[fo("F1", true), eq("S1", true), eq("S2", true), fo("F2", true)]);
        assert_eq!(defaults.equities, Some(1));
        assert_eq!(defaults.derivatives, Some(0));
    }

    #[test]
    fn test_defaults_resolved_even_when_filtered_out() {
        let state = SessionState::authenticated(
            vec![eq("S1", true), fo("F1", true)],
            AccountTypeFilter::EquitiesOnly,
        );
        assert_eq!(ids(state.visible_accounts()), vec!["S1"]);
        assert_eq!(
            state.default_account(AccountKind::Derivatives).map(|a| a.account_id.as_str()),
            Some("F1")
        );
    }

    #[test]
    fn test_apply_filter_is_absolute() {
        let mut state = SessionState::authenticated(
            vec![eq("S1", true), fo("F1", true), eq("S2", false)],
            AccountTypeFilter::All,
        );

        assert_eq!(state.apply_filter(AccountTypeFilter::DerivativesOnly), Ok(1));
        assert_eq!(state.apply_filter(AccountTypeFilter::EquitiesOnly), Ok(2));
        assert_eq!(ids(state.visible_accounts()), vec!["S1", "S2"]);
        assert_eq!(state.apply_filter(AccountTypeFilter::All), Ok(3));
    }

    #[test]
    fn test_empty_switch_rejected_and_view_kept() {
        let mut state = SessionState::authenticated(vec![eq("S1", true)], AccountTypeFilter::All);

        assert_eq!(
            state.apply_filter(AccountTypeFilter::DerivativesOnly),
            Err(SwitchRejection::NoMatchingAccounts)
        );
        assert_eq!(ids(state.visible_accounts()), vec!["S1"]);
        assert_eq!(state.filter(), AccountTypeFilter::All);
    }

    #[test]
    fn test_apply_filter_requires_login() {
        let mut state = SessionState::new();
        assert_eq!(
            state.apply_filter(AccountTypeFilter::All),
            Err(SwitchRejection::NotAuthenticated)
        );
    }

    #[test]
    fn test_set_default_requires_signed() {
        let mut state = SessionState::authenticated(
            vec![eq("S1", true), eq("S2", true), eq("S3", false)],
            AccountTypeFilter::All,
        );
        assert_eq!(state.set_default(1), Some(AccountKind::Equities));
        assert!(state.is_default(1));
        assert!(!state.is_default(0));

        assert_eq!(state.set_default(2), None);
        assert_eq!(state.set_default(9), None);

        // A switch recomputes from scratch.
        state.apply_filter(AccountTypeFilter::All).unwrap();
        assert!(state.is_default(0));
    }

    #[test]
    fn test_counts_and_clear() {
        let mut state = SessionState::authenticated(
            vec![eq("S1", true), fo("F1", true), eq("S2", false)],
            AccountTypeFilter::DerivativesOnly,
        );
        assert_eq!(
            state.counts(),
            AccountTypeCounts {
                equities: 2,
                derivatives: 1,
                total: 3
            }
        );
        assert_eq!(state.position(AccountKind::Equities, "9A95", "S2"), Some(2));
        assert_eq!(state.position(AccountKind::Derivatives, "9A95", "S2"), None);

        state.clear();
        assert!(!state.is_authenticated());
        assert_eq!(state.counts().total, 0);
        assert_eq!(state.filter(), AccountTypeFilter::All);
    }
}
