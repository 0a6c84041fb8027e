//! Interactive menu
//!
//! A numbered menu over one `SessionManager`, reading choices line by line.
//! End of input behaves like choosing Exit.

use std::io::{BufRead, Write};

use crate::display::{
    format_account_details, format_counts, format_session_status, format_visible_accounts,
};
use crate::error::TraderResult;
use crate::models::AccountTypeFilter;
use crate::session::{AccountDetail, SessionManager};

use super::session::{collect_credentials, prompt_line, SessionContext};

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Login,
    ShowAccounts,
    AccountDetails,
    Status,
    SwitchType,
    SetDefault,
    Logout,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::Login,
        MenuChoice::ShowAccounts,
        MenuChoice::AccountDetails,
        MenuChoice::Status,
        MenuChoice::SwitchType,
        MenuChoice::SetDefault,
        MenuChoice::Logout,
        MenuChoice::Exit,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        let n: usize = s.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::ShowAccounts => "Show Accounts",
            Self::AccountDetails => "Show All Account Details",
            Self::Status => "Show Client Status",
            Self::SwitchType => "Switch Account Type",
            Self::SetDefault => "Set Default Account",
            Self::Logout => "Logout",
            Self::Exit => "Exit",
        }
    }
}

/// Menu loop over a manager
pub struct InteractiveShell<'a, R, W> {
    manager: &'a mut SessionManager,
    ctx: &'a SessionContext,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> InteractiveShell<'a, R, W> {
    pub fn new(manager: &'a mut SessionManager, ctx: &'a SessionContext, input: R, output: W) -> Self {
        Self {
            manager,
            ctx,
            input,
            output,
        }
    }

    /// Run until Exit or end of input
    pub fn run(&mut self) -> TraderResult<()> {
        loop {
            self.print_menu()?;
            let line = match prompt_line(&mut self.input, &mut self.output, "Select an option (1-8): ")? {
                Some(line) => line,
                None => {
                    writeln!(self.output)?;
                    break;
                }
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting application...")?;
                    break;
                }
                Some(choice) => self.dispatch(choice)?,
                None => writeln!(self.output, "Invalid option. Please select 1-8.")?,
            }
        }
        Ok(())
    }

    fn print_menu(&mut self) -> TraderResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "=".repeat(40))?;
        writeln!(self.output, "KGI Trading Application Menu")?;
        writeln!(self.output, "{}", "=".repeat(40))?;
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, choice.label())?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> TraderResult<()> {
        match choice {
            MenuChoice::Login => self.login(),
            MenuChoice::ShowAccounts => self.show_accounts(),
            MenuChoice::AccountDetails => self.account_details(),
            MenuChoice::Status => {
                let status = self.manager.session_status();
                write!(self.output, "{}", format_session_status(&status))?;
                Ok(())
            }
            MenuChoice::SwitchType => self.switch_type(),
            MenuChoice::SetDefault => self.set_default(),
            MenuChoice::Logout => self.logout(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn require_login(&mut self) -> TraderResult<bool> {
        if self.manager.is_connected() {
            return Ok(true);
        }
        writeln!(self.output, "Not logged in. Please login first.")?;
        Ok(false)
    }

    fn login(&mut self) -> TraderResult<()> {
        if self.manager.is_connected() {
            writeln!(self.output, "Already logged in. Please logout first.")?;
            return Ok(());
        }

        let creds = collect_credentials(
            &mut self.input,
            &mut self.output,
            self.ctx.user_id.as_deref(),
        )?;
        let (user_id, secret) = match creds {
            Some(creds) => creds,
            None => return Ok(()),
        };

        writeln!(self.output, "Attempting to login...")?;
        if self.manager.login(&user_id, &secret, self.ctx.filter) {
            writeln!(self.output, "Login successful!")?;
            writeln!(
                self.output,
                "{}",
                format_counts(&self.manager.account_type_counts())
            )?;
        } else {
            writeln!(self.output, "Login failed. Please check your credentials.")?;
        }
        Ok(())
    }

    fn show_accounts(&mut self) -> TraderResult<()> {
        if !self.require_login()? {
            return Ok(());
        }
        let visible = self.manager.list_visible_accounts();
        writeln!(
            self.output,
            "{} ({} accounts):",
            self.manager.filter(),
            visible.len()
        )?;
        write!(self.output, "{}", format_visible_accounts(&visible))?;
        Ok(())
    }

    fn account_details(&mut self) -> TraderResult<()> {
        if !self.require_login()? {
            return Ok(());
        }
        let details = self.manager.list_all_account_details();
        write!(self.output, "{}", format_account_details(&details))?;
        Ok(())
    }

    fn switch_type(&mut self) -> TraderResult<()> {
        if !self.require_login()? {
            return Ok(());
        }

        writeln!(self.output, "Currently showing: {}", self.manager.filter())?;
        for (i, filter) in AccountTypeFilter::ALL.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, filter)?;
        }
        let line = prompt_line(&mut self.input, &mut self.output, "Select account type (1-3): ")?
            .unwrap_or_default();
        let filter = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| AccountTypeFilter::ALL.get(i).copied())
            .or_else(|| AccountTypeFilter::parse(&line));

        let filter = match filter {
            Some(filter) => filter,
            None => {
                writeln!(self.output, "Invalid account type.")?;
                return Ok(());
            }
        };

        if self.manager.switch_account_type(filter) {
            let visible = self.manager.list_visible_accounts().len();
            writeln!(self.output, "Now showing {}: {} accounts", filter, visible)?;
        } else {
            writeln!(self.output, "No accounts available for {}.", filter)?;
        }
        Ok(())
    }

    fn set_default(&mut self) -> TraderResult<()> {
        if !self.require_login()? {
            return Ok(());
        }

        let account_id = prompt_line(&mut self.input, &mut self.output, "Enter Account ID: ")?
            .unwrap_or_default();
        if account_id.is_empty() {
            writeln!(self.output, "Account ID cannot be empty.")?;
            return Ok(());
        }

        let candidates: Vec<AccountDetail> = self
            .manager
            .list_all_account_details()
            .into_iter()
            .filter(|d| d.account_id == account_id)
            .collect();
        let detail = match choose_account(&mut self.input, &mut self.output, candidates)? {
            Some(detail) => detail,
            None => {
                writeln!(self.output, "Account {} not found.", account_id)?;
                return Ok(());
            }
        };

        if self
            .manager
            .set_default_account(detail.kind, &detail.broker_id, &detail.account_id)
        {
            writeln!(
                self.output,
                "Default {} account set: {}",
                detail.kind, detail.account_id
            )?;
        } else {
            writeln!(
                self.output,
                "Could not set {} as default (unsigned account or rejected by broker).",
                account_id
            )?;
        }
        Ok(())
    }

    fn logout(&mut self) -> TraderResult<()> {
        if !self.require_login()? {
            return Ok(());
        }
        writeln!(self.output, "Logging out...")?;
        if self.manager.logout() {
            writeln!(self.output, "Logout successful!")?;
        } else {
            writeln!(self.output, "Logout failed.")?;
        }
        Ok(())
    }
}

/// Pick one account among those sharing an account number
///
/// Asks which one is meant when the number exists under several brokers or kinds.
fn choose_account<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mut candidates: Vec<AccountDetail>,
) -> TraderResult<Option<AccountDetail>> {
    if candidates.len() <= 1 {
        return Ok(candidates.pop());
    }

    writeln!(output, "Several accounts use this number:")?;
    for (i, detail) in candidates.iter().enumerate() {
        writeln!(
            output,
            "  {}. [{}] {}-{}",
            i + 1,
            detail.kind.short_label(),
            detail.broker_id,
            detail.account_id
        )?;
    }
    let prompt = format!("Select account (1-{}): ", candidates.len());
    let choice = prompt_line(input, output, &prompt)?
        .and_then(|line| line.parse::<usize>().ok())
        .filter(|n| (1..=candidates.len()).contains(n));
    Ok(choice.map(|n| candidates.swap_remove(n - 1)))
}
