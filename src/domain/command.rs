use super::account::AccountId;
use super::ticket::{Otp, TicketNumber};
use crate::error::QueueError;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Register,
    Issue,
    Admit,
    Release,
    Reset,
    SetCapacity,
    Status,
    Dashboard,
}

/// One raw row of a command batch, before per-command field validation.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub command: CommandKind,
    pub account: String,
    #[serde(default)]
    pub ticket: Option<TicketNumber>,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub value: Option<u32>,
}

/// A validated queue operation addressed to one account.
#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Register(AccountId),
    Issue(AccountId),
    Admit(AccountId),
    Release {
        account: AccountId,
        ticket: TicketNumber,
        code: Otp,
    },
    Reset(AccountId),
    SetCapacity {
        account: AccountId,
        max_customers: u32,
    },
    Status(AccountId),
    Dashboard(AccountId),
}

impl Command {
    pub fn account(&self) -> &AccountId {
        match self {
            Command::Register(account)
            | Command::Issue(account)
            | Command::Admit(account)
            | Command::Reset(account)
            | Command::Status(account)
            | Command::Dashboard(account) => account,
            Command::Release { account, .. } | Command::SetCapacity { account, .. } => account,
        }
    }
}

impl TryFrom<CommandRecord> for Command {
    type Error = QueueError;

    fn try_from(record: CommandRecord) -> Result<Self, Self::Error> {
        if record.account.is_empty() {
            return Err(QueueError::InvalidCommand(
                "account must not be empty".to_string(),
            ));
        }
        let account = AccountId::new(record.account);

        let command = match record.command {
            CommandKind::Register => Command::Register(account),
            CommandKind::Issue => Command::Issue(account),
            CommandKind::Admit => Command::Admit(account),
            CommandKind::Reset => Command::Reset(account),
            CommandKind::Status => Command::Status(account),
            CommandKind::Dashboard => Command::Dashboard(account),
            CommandKind::Release => {
                let ticket = record.ticket.ok_or_else(|| {
                    QueueError::InvalidCommand("release requires a ticket".to_string())
                })?;
                let code = record
                    .code
                    .ok_or_else(|| QueueError::InvalidCommand("release requires a code".to_string()))?;
                let code = Otp::new(code).ok_or_else(|| {
                    QueueError::InvalidCommand(format!("code {} has more than 4 digits", code))
                })?;
                Command::Release {
                    account,
                    ticket,
                    code,
                }
            }
            CommandKind::SetCapacity => {
                let max_customers = record.value.ok_or_else(|| {
                    QueueError::InvalidCommand("set_capacity requires a value".to_string())
                })?;
                Command::SetCapacity {
                    account,
                    max_customers,
                }
            }
        };
        Ok(command)
    }
}
