//! spscring - Wait-Free Single-Producer Single-Consumer Ring Buffer
//!
//! A fixed-capacity, lock-free SPSC ring buffer built as a low-latency
//! transport primitive for inter-thread message passing. The producer side
//! uses a two-phase write protocol - claim a slot, populate it, commit it -
//! so a slot's memory becomes visible to the consumer only after it is fully
//! written. The consumer mirrors it with peek (non-destructive inspection)
//! and pop (release).
//!
//! # Key Features
//!
//! - Wait-free operations: every call returns in a bounded number of steps,
//!   no locks, no CAS, no internal blocking
//! - Minimal fence placement: one Release/Acquire pair per direction
//! - Cache-padded cursors plus cached remote cursors to keep cross-core
//!   traffic off the hot path
//! - Power-of-two capacity so index wrapping is a single bitmask
//! - Full and empty are ordinary `Option` outcomes, never errors
//!
//! # Example
//!
//! ```
//! use spscring::{channel, Config};
//!
//! let (mut producer, mut consumer) = channel::<u64>(Config::with_capacity(1024).unwrap());
//!
//! // Producer side: two-phase write
//! if let Some(mut slot) = producer.claim_for_write() {
//!     slot.write(42);
//!     slot.commit();
//! }
//!
//! // Or the one-shot convenience
//! producer.try_push(43);
//!
//! // Consumer side: inspect, then release
//! assert_eq!(consumer.peek(), Some(&42));
//! consumer.pop();
//!
//! // Or take ownership directly
//! assert_eq!(consumer.try_pop(), Some(43));
//! assert_eq!(consumer.try_pop(), None);
//! ```
//!
//! # Threading contract
//!
//! [`channel`] splits the ring into a [`Producer`] and a [`Consumer`]; each
//! half is owned by exactly one thread, and the mutating methods take
//! `&mut self`, so the single-producer single-consumer discipline is checked
//! by the compiler rather than documented. Shutdown signalling and thread
//! lifecycle belong to the owner: the storage is freed once both halves are
//! dropped.

mod backoff;
mod channel;
mod config;
mod invariants;
mod ring;
mod slot;

pub use backoff::Backoff;
pub use channel::{channel, Consumer, Producer};
pub use config::{Config, ConfigError, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use slot::WriteSlot;
