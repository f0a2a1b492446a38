use std::hint;
use std::thread;

/// Escalating busy-wait helper for callers polling a full or empty ring.
///
/// The ring's operations never block, sleep, or spin internally; retry
/// policy belongs entirely to the caller. `Backoff` packages the usual
/// policy: a growing burst of PAUSE hints while the wait is short, then OS
/// yields once the other side is clearly behind.
///
/// # Example
///
/// ```
/// use spscring::{channel, Config, Backoff};
///
/// let (mut producer, _consumer) = channel::<u64>(Config::default());
/// let mut wait = Backoff::new();
/// loop {
///     if let Some(mut slot) = producer.claim_for_write() {
///         slot.write(1);
///         slot.commit();
///         break;
///     }
///     wait.spin();
/// }
/// ```
#[derive(Debug)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // up to 2^6 = 64 PAUSEs per burst, then yield

    /// Creates a fresh spin-wait state.
    #[inline]
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    /// Waits a little longer than last time.
    ///
    /// The PAUSE hint is a power-management courtesy to the sibling
    /// hyperthread, not a correctness mechanism.
    #[inline]
    pub fn spin(&mut self) {
        if self.step <= Self::SPIN_LIMIT {
            for _ in 0..(1u32 << self.step) {
                hint::spin_loop();
            }
            self.step += 1;
        } else {
            thread::yield_now();
        }
    }

    /// Resets after a successful operation so the next wait starts cheap.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_escalates_and_resets() {
        let mut wait = Backoff::new();
        assert_eq!(wait.step, 0);

        wait.spin();
        assert!(wait.step > 0);

        // Escalation saturates at the yield stage
        for _ in 0..20 {
            wait.spin();
        }
        assert_eq!(wait.step, Backoff::SPIN_LIMIT + 1);

        wait.reset();
        assert_eq!(wait.step, 0);
    }
}
