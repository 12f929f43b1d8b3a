use proptest::prelude::*;
use queuedesk::domain::account::{AccountId, AccountState, AdmitOutcome, ReleaseOutcome};
use queuedesk::domain::otp::OtpGenerator;
use queuedesk::domain::ticket::{Otp, Ticket};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Issue,
    Admit,
    /// Release the processing entry at `index % len`, optionally with a corrupted code.
    Release { index: usize, corrupt: bool },
    SetCapacity(u32),
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => Just(Op::Issue),
        4 => Just(Op::Admit),
        2 => (any::<usize>(), any::<bool>())
            .prop_map(|(index, corrupt)| Op::Release { index, corrupt }),
        1 => (0u32..6).prop_map(Op::SetCapacity),
        1 => Just(Op::Reset),
    ]
}

fn assert_unique(account: &AccountState) {
    let outstanding: Vec<Ticket> = account
        .waiting
        .iter()
        .chain(account.processing.iter())
        .copied()
        .collect();
    let numbers: HashSet<u32> = outstanding.iter().map(|t| t.number).collect();
    let codes: HashSet<Otp> = outstanding.iter().map(|t| t.code).collect();
    assert_eq!(numbers.len(), outstanding.len(), "duplicate ticket number");
    assert_eq!(codes.len(), outstanding.len(), "duplicate code");
    assert!(numbers.iter().all(|n| *n <= account.issued_count));
}

proptest! {
    #[test]
    fn prop_queue_invariants_hold(seed in any::<u64>(), ops in prop::collection::vec(op_strategy(), 1..200)) {
        let mut rng = StdRng::seed_from_u64(seed);
        let generator = OtpGenerator::new();
        let mut account = AccountState::new(AccountId::new("bakery"));
        let mut last_admitted = 0;
        let mut last_issued = 0;

        for op in ops {
            let before = account.clone();
            match op {
                Op::Issue => {
                    let ticket = account.issue(&generator, &mut rng).unwrap();
                    prop_assert_eq!(ticket.number, last_issued + 1);
                    last_issued = ticket.number;
                }
                Op::Admit => match account.admit_next() {
                    AdmitOutcome::Admitted { current_serving, waiting } => {
                        // FIFO: admitted strictly after everything admitted before
                        prop_assert!(current_serving > last_admitted);
                        prop_assert_eq!(Some(&current_serving), before.waiting.front().map(|t| &t.number));
                        prop_assert_eq!(waiting, before.waiting.len() - 1);
                        prop_assert!(account.processing.len() <= account.max_customers as usize);
                        last_admitted = current_serving;
                    }
                    AdmitOutcome::NothingToAdmit => {
                        prop_assert!(before.waiting.is_empty());
                        prop_assert_eq!(&account, &before);
                    }
                    AdmitOutcome::CapacityReached { .. } => {
                        prop_assert!(before.processing.len() >= before.max_customers as usize);
                        prop_assert_eq!(&account, &before);
                    }
                },
                Op::Release { index, corrupt } => {
                    if account.processing.is_empty() {
                        prop_assert_eq!(account.release(1, Otp::new(0).unwrap()), ReleaseOutcome::Invalid);
                        prop_assert_eq!(&account, &before);
                        continue;
                    }
                    let target = account.processing[index % account.processing.len()];
                    if corrupt {
                        let code = Otp::new((target.code.value() + 1) % (Otp::MAX + 1)).unwrap();
                        // The shifted code may belong to another processing ticket, never to this number.
                        prop_assert_eq!(account.release(target.number, code), ReleaseOutcome::Invalid);
                        prop_assert_eq!(&account, &before);
                    } else {
                        prop_assert_eq!(account.release(target.number, target.code), ReleaseOutcome::Released);
                        prop_assert_eq!(account.release(target.number, target.code), ReleaseOutcome::Invalid);
                        prop_assert_eq!(account.processing.len(), before.processing.len() - 1);
                        prop_assert_eq!(&account.waiting, &before.waiting);
                    }
                }
                Op::SetCapacity(max) => {
                    account.set_capacity(max);
                    prop_assert_eq!(&account.processing, &before.processing);
                }
                Op::Reset => {
                    account.reset();
                    let once = account.clone();
                    account.reset();
                    prop_assert_eq!(&account, &once);
                    prop_assert_eq!(account.issued_count, 0);
                    prop_assert_eq!(account.current_serving, 0);
                    last_admitted = 0;
                    last_issued = 0;
                }
            }

            // Monotone counters between resets
            prop_assert!(account.issued_count >= before.issued_count || account.issued_count == 0);
            prop_assert!(account.current_serving >= before.current_serving || account.current_serving == 0);
            assert_unique(&account);
        }
    }
}
