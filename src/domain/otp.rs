use super::ticket::Otp;
use rand::Rng;
use std::collections::HashSet;

/// Draws one-time codes that do not collide with any outstanding ticket.
///
/// The generator is stateless; uniqueness is only checked against the two
/// supplied sets, never against codes of tickets that were already closed.
#[derive(Debug, Default, Clone, Copy)]
pub struct OtpGenerator;

impl OtpGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Returns a uniformly random code in `0..=9999` absent from both sets.
    ///
    /// Retries until a free code is found. Callers must keep the number of
    /// outstanding codes below 10,000, otherwise no free code exists.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        waiting: &HashSet<Otp>,
        processing: &HashSet<Otp>,
    ) -> Otp {
        loop {
            let candidate = Otp(rng.gen_range(0..=Otp::MAX));
            if !waiting.contains(&candidate) && !processing.contains(&candidate) {
                return candidate;
            }
        }
    }
}
