use crate::domain::account::AccountState;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One line of the end-of-run report.
#[derive(Debug, Serialize, PartialEq)]
pub struct AccountReport<'a> {
    pub account: &'a str,
    pub current_serving: u32,
    pub waiting: usize,
    pub processing: usize,
    pub issued: u32,
    pub max_customers: u32,
}

impl<'a> From<&'a AccountState> for AccountReport<'a> {
    fn from(account: &'a AccountState) -> Self {
        Self {
            account: account.id.as_str(),
            current_serving: account.current_serving,
            waiting: account.waiting.len(),
            processing: account.processing.len(),
            issued: account.issued_count,
            max_customers: account.max_customers,
        }
    }
}

/// Writes account summaries as CSV.
///
/// Ticket codes are never written, only counts.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: &[AccountState]) -> Result<()> {
        if accounts.is_empty() {
            // serde only emits the header alongside the first record
            self.writer.write_record([
                "account",
                "current_serving",
                "waiting",
                "processing",
                "issued",
                "max_customers",
            ])?;
        }
        for account in accounts {
            self.writer.serialize(AccountReport::from(account))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
