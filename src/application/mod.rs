//! Application layer containing the queue orchestration.
//!
//! This module defines the `QueueService` which acts as the primary entry point
//! for every queue operation. It serializes access to each account with its own
//! `tokio` mutex so that read-then-write steps such as code generation and the
//! capacity check can never interleave.

pub mod queue;
