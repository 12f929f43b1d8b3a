use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a ticket in an account's issue order, starting at 1.
pub type TicketNumber = u32;

/// A 4-digit one-time code paired with a ticket number.
///
/// Leading zeros are permitted, so `0042` is stored as the plain integer `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Otp(pub(crate) u16);

impl Otp {
    /// Largest value a 4-digit code can take.
    pub const MAX: u16 = 9999;

    /// Returns `None` if `value` does not fit in four digits.
    pub fn new(value: u16) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Otp {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("code {} has more than 4 digits", value))
    }
}

impl From<Otp> for u16 {
    fn from(code: Otp) -> Self {
        code.0
    }
}

impl fmt::Display for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A customer's place in the queue together with the credential needed to release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub number: TicketNumber,
    pub code: Otp,
}

impl Ticket {
    pub fn new(number: TicketNumber, code: Otp) -> Self {
        Self { number, code }
    }

    pub fn matches(&self, number: TicketNumber, code: Otp) -> bool {
        self.number == number && self.code == code
    }
}
