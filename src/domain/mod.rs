//! Domain layer: queue state, tickets and one-time codes, plus the storage port.
//!
//! Nothing in here performs I/O or logging.

pub mod account;
pub mod command;
pub mod otp;
pub mod ports;
pub mod ticket;
