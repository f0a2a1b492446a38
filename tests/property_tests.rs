//! Property-based tests for the cursor invariants.
//!
//! Each property drives the ring through a randomized sequence of produce
//! and consume operations and checks the observable invariants after every
//! step: the committed count never exceeds capacity, FIFO order is
//! preserved, and full/empty are reported exactly when the model says so.

use proptest::prelude::*;
use spscring::{channel, Config};
use std::collections::VecDeque;

proptest! {
    /// The committed count never exceeds capacity, whatever the op sequence.
    #[test]
    fn prop_bounded_count(
        ops in prop::collection::vec(prop::bool::ANY, 1..200),
        bits in 0u8..6,
    ) {
        let (mut producer, mut consumer) = channel::<u64>(Config::new(bits));
        let capacity = producer.capacity();
        let mut seq = 0u64;

        for is_push in ops {
            if is_push {
                producer.try_push(seq);
                seq += 1;
            } else {
                consumer.try_pop();
            }
            prop_assert!(consumer.len() <= capacity,
                "committed count {} exceeds capacity {}", consumer.len(), capacity);
        }
    }

    /// The ring agrees with a VecDeque model: same values, same order, same
    /// full/empty answers.
    #[test]
    fn prop_matches_queue_model(
        ops in prop::collection::vec(prop::bool::ANY, 1..300),
        bits in 0u8..5,
    ) {
        let (mut producer, mut consumer) = channel::<u64>(Config::new(bits));
        let capacity = producer.capacity();
        let mut model: VecDeque<u64> = VecDeque::new();
        let mut seq = 0u64;

        for is_push in ops {
            if is_push {
                let pushed = producer.try_push(seq);
                prop_assert_eq!(pushed, model.len() < capacity,
                    "push outcome disagrees with model at len {}", model.len());
                if pushed {
                    model.push_back(seq);
                }
                seq += 1;
            } else {
                let popped = consumer.try_pop();
                let expected = model.pop_front();
                prop_assert_eq!(popped, expected, "pop value disagrees with model");
            }

            prop_assert_eq!(consumer.len(), model.len());
            prop_assert_eq!(consumer.is_empty(), model.is_empty());
            prop_assert_eq!(consumer.is_full(), model.len() == capacity);

            // peek never disturbs state and always shows the model's front
            prop_assert_eq!(consumer.peek(), model.front());
            prop_assert_eq!(consumer.len(), model.len());
        }
    }

    /// Claims that are abandoned instead of committed leave no trace.
    #[test]
    fn prop_abandoned_claims_are_invisible(
        abandoned in prop::collection::vec(prop::bool::ANY, 1..100),
    ) {
        let (mut producer, mut consumer) = channel::<u64>(Config::new(3));
        let capacity = producer.capacity();
        let mut committed = Vec::new();
        let mut seq = 0u64;

        for abandon in abandoned {
            if let Some(mut slot) = producer.claim_for_write() {
                slot.write(seq);
                if abandon {
                    drop(slot);
                } else {
                    slot.commit();
                    committed.push(seq);
                }
            }
            seq += 1;
        }

        prop_assert_eq!(consumer.len(), committed.len().min(capacity));
        let mut observed = Vec::new();
        while let Some(value) = consumer.try_pop() {
            observed.push(value);
        }
        prop_assert_eq!(observed.as_slice(), &committed[..observed.len()]);
    }
}
