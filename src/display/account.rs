//! Account display formatting
//!
//! Formats the visible view and the full account snapshot for terminal output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Account;
use crate::session::AccountDetail;

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Person")]
    owner_id: String,
    #[tabled(rename = "Broker")]
    broker_id: String,
    #[tabled(rename = "Account")]
    account_id: String,
    #[tabled(rename = "Signed")]
    signed: &'static str,
    #[tabled(rename = "Trader")]
    trader: String,
    #[tabled(rename = "Visible")]
    visible: &'static str,
    #[tabled(rename = "Default")]
    default: &'static str,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Format the currently visible accounts, one per line
pub fn format_visible_accounts(accounts: &[&Account]) -> String {
    if accounts.is_empty() {
        return "No accounts to show.".to_string();
    }

    let mut output = String::new();
    for (i, account) in accounts.iter().enumerate() {
        output.push_str(&format!(
            "  {}. [{}] {}-{} ({})\n",
            i + 1,
            account.kind.short_label(),
            account.broker_id,
            account.account_id,
            account.signed_label()
        ));
    }
    output
}

/// Format every account of the session as a table
pub fn format_account_details(details: &[AccountDetail]) -> String {
    if details.is_empty() {
        return "No accounts found.".to_string();
    }

    let rows = details.iter().map(|d| DetailRow {
        index: d.index,
        kind: d.kind.to_string(),
        owner_id: d.owner_id.clone(),
        broker_id: d.broker_id.clone(),
        account_id: d.account_id.clone(),
        signed: yes_no(d.signed),
        trader: d.trader.clone().unwrap_or_default(),
        visible: yes_no(d.visible),
        default: if d.is_default { "*" } else { "" },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountKind;

    fn detail(index: usize, kind: AccountKind, id: &str, visible: bool, is_default: bool) -> AccountDetail {
        AccountDetail {
            index,
            kind,
            owner_id: "A1".into(),
            broker_id: "9A95".into(),
            account_id: id.into(),
            signed: is_default,
            trader: None,
            visible,
            is_default,
        }
    }

    #[test]
    fn test_format_visible_accounts() {
        let stock = Account::new(AccountKind::Equities, "A1", "9A95", "S1").with_signed(true);
        let future = Account::new(AccountKind::Derivatives, "A1", "F002", "F1");

        let output = format_visible_accounts(&[&stock, &future]);
        assert!(output.contains("1. [EQ] 9A95-S1 (Signed)"));
        assert!(output.contains("2. [FO] F002-F1 (Not Signed)"));
    }

    #[test]
    fn test_format_empty() {
        assert!(format_visible_accounts(&[]).contains("No accounts"));
        assert!(format_account_details(&[]).contains("No accounts found"));
    }

    #[test]
    fn test_format_account_details() {
        let details = vec![
            detail(1, AccountKind::Equities, "S1", true, true),
            detail(2, AccountKind::Derivatives, "F1", false, false),
        ];
        let output = format_account_details(&details);
        assert!(output.contains("Account"));
        assert!(output.contains("S1"));
        assert!(output.contains("Derivatives"));
        assert!(output.contains("Visible"));
    }
}
