use super::otp::OtpGenerator;
use super::ticket::{Otp, Ticket, TicketNumber};
use crate::error::{QueueError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Number of distinct 4-digit codes, and therefore the most tickets that can be outstanding at once.
const CODE_SPACE: usize = Otp::MAX as usize + 1;

/// Identifies a registered business. Opaque to the queue logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Result of trying to move the oldest waiting ticket into service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// The waiting line is empty.
    NothingToAdmit,
    /// `processing` already holds `max_customers` tickets.
    CapacityReached { waiting: usize },
    /// A ticket was admitted and is now the one being served.
    Admitted {
        current_serving: TicketNumber,
        waiting: usize,
    },
}

/// Result of an exit claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    Invalid,
}

/// Read-only view shown on the operator's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dashboard {
    pub current_serving: TicketNumber,
    pub waiting: usize,
}

/// The complete queue state of a single account.
///
/// All transitions are synchronous and infallible apart from exhausting codes or ticket numbers,
/// so callers can apply them to a working copy and persist the copy only on success.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AccountState {
    pub id: AccountId,
    /// Issued but not yet admitted, in arrival order.
    pub waiting: VecDeque<Ticket>,
    /// Admitted and being served, in admission order.
    pub processing: Vec<Ticket>,
    /// Tickets issued since the last reset. The next ticket gets `issued_count + 1`.
    pub issued_count: u32,
    /// Capacity of `processing`.
    pub max_customers: u32,
    /// Number of the ticket most recently admitted, 0 if none.
    pub current_serving: TicketNumber,
    /// Bumped by the store on every successful save.
    #[serde(default)]
    pub revision: u64,
}

impl AccountState {
    /// A freshly registered account: nothing issued and zero capacity.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            waiting: VecDeque::new(),
            processing: Vec::new(),
            issued_count: 0,
            max_customers: 0,
            current_serving: 0,
            revision: 0,
        }
    }

    pub fn waiting_codes(&self) -> HashSet<Otp> {
        self.waiting.iter().map(|t| t.code).collect()
    }

    pub fn processing_codes(&self) -> HashSet<Otp> {
        self.processing.iter().map(|t| t.code).collect()
    }

    /// Appends a new ticket to the waiting line and returns it.
    pub fn issue<R: Rng + ?Sized>(
        &mut self,
        generator: &OtpGenerator,
        rng: &mut R,
    ) -> Result<Ticket> {
        if self.waiting.len() + self.processing.len() >= CODE_SPACE {
            return Err(QueueError::CodesExhausted(self.id.clone()));
        }
        let number = self
            .issued_count
            .checked_add(1)
            .ok_or_else(|| QueueError::TicketNumbersExhausted(self.id.clone()))?;

        let code = generator.generate(rng, &self.waiting_codes(), &self.processing_codes());
        let ticket = Ticket::new(number, code);
        self.waiting.push_back(ticket);
        self.issued_count = number;
        Ok(ticket)
    }

    /// Moves the oldest waiting ticket into `processing` if there is room.
    ///
    /// An empty line is reported before a full house.
    pub fn admit_next(&mut self) -> AdmitOutcome {
        if self.waiting.is_empty() {
            return AdmitOutcome::NothingToAdmit;
        }
        if self.processing.len() >= self.max_customers as usize {
            return AdmitOutcome::CapacityReached {
                waiting: self.waiting.len(),
            };
        }

        match self.waiting.pop_front() {
            Some(ticket) => {
                self.processing.push(ticket);
                self.current_serving = ticket.number;
                AdmitOutcome::Admitted {
                    current_serving: self.current_serving,
                    waiting: self.waiting.len(),
                }
            }
            None => AdmitOutcome::NothingToAdmit,
        }
    }

    /// Closes the ticket in `processing` matching both `number` and `code`.
    ///
    /// Tickets still waiting cannot be released.
    pub fn release(&mut self, number: TicketNumber, code: Otp) -> ReleaseOutcome {
        if self.issued_count == 0 {
            return ReleaseOutcome::Invalid;
        }

        match self.processing.iter().position(|t| t.matches(number, code)) {
            Some(index) => {
                self.processing.remove(index);
                ReleaseOutcome::Released
            }
            None => ReleaseOutcome::Invalid,
        }
    }

    /// Drops every ticket and zeroes the counters. Capacity is kept.
    pub fn reset(&mut self) {
        self.waiting.clear();
        self.processing.clear();
        self.issued_count = 0;
        self.current_serving = 0;
    }

    /// Changes the capacity. Tickets already in `processing` are never evicted.
    pub fn set_capacity(&mut self, max_customers: u32) {
        self.max_customers = max_customers;
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            current_serving: self.current_serving,
            waiting: self.waiting.len(),
        }
    }
}
