//! Outer adapters that turn external input into commands and state into reports.

pub mod csv;
