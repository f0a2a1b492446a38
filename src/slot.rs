use crate::ring::Ring;
use std::mem::MaybeUninit;

/// Exclusive claim on the next unused ring slot.
///
/// The producer obtains a `WriteSlot` from
/// [`Producer::claim_for_write`](crate::Producer::claim_for_write),
/// populates it with [`write`](WriteSlot::write) (or in place through
/// [`as_mut_ptr`](WriteSlot::as_mut_ptr)), then publishes it with
/// [`commit`](WriteSlot::commit). Because `commit` consumes the handle, a
/// claim can be committed at most once, and a commit without a prior claim
/// cannot be expressed at all; the mutable borrow of the producer keeps a
/// second claim from existing alongside this one.
///
/// Dropping a `WriteSlot` without committing abandons the claim: the write
/// cursor does not move, any value stored via `write` is dropped, and the
/// same slot is handed out by the next claim.
///
/// # Example
///
/// ```
/// use spscring::{channel, Config};
///
/// let (mut producer, consumer) = channel::<u64>(Config::default());
/// if let Some(mut slot) = producer.claim_for_write() {
///     slot.write(42);
///     slot.commit(); // now visible to the consumer
/// }
/// assert_eq!(consumer.peek(), Some(&42));
/// ```
pub struct WriteSlot<'a, T> {
    slot: &'a mut MaybeUninit<T>,
    ring: &'a Ring<T>,
    written: bool,
}

impl<'a, T> WriteSlot<'a, T> {
    /// Creates a claim over an unused slot.
    pub(crate) fn new(slot: &'a mut MaybeUninit<T>, ring: &'a Ring<T>) -> Self {
        Self {
            slot,
            ring,
            written: false,
        }
    }

    /// Populates the claimed slot.
    ///
    /// Writing twice replaces the first value (dropping it) - the slot still
    /// publishes as a single record on commit.
    #[inline]
    pub fn write(&mut self, value: T) {
        if self.written {
            // SAFETY: written is only set after the slot was initialized
            unsafe { self.slot.assume_init_drop() };
        }
        self.slot.write(value);
        self.written = true;
    }

    /// Returns a raw pointer to the claimed slot for populating it field by
    /// field, without constructing a whole `T` on the producer's stack.
    ///
    /// The slot starts uninitialized: write every field (e.g. via
    /// [`std::ptr::addr_of_mut!`]) before publishing. Because this method
    /// cannot see which fields were written, the claim does not count as
    /// populated - publish with [`commit_unchecked`](WriteSlot::commit_unchecked),
    /// and note that abandoning the claim after raw writes leaks their
    /// contents rather than dropping them.
    ///
    /// # Example
    ///
    /// ```
    /// use spscring::{channel, Config};
    ///
    /// let (mut producer, mut consumer) = channel::<(u64, u64)>(Config::default());
    /// let mut slot = producer.claim_for_write().unwrap();
    /// let record = slot.as_mut_ptr();
    /// unsafe {
    ///     std::ptr::addr_of_mut!((*record).0).write(1);
    ///     std::ptr::addr_of_mut!((*record).1).write(2);
    ///     slot.commit_unchecked();
    /// }
    /// assert_eq!(consumer.try_pop(), Some((1, 2)));
    /// ```
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.slot.as_mut_ptr()
    }

    /// Returns true once the slot has been populated via
    /// [`write`](WriteSlot::write).
    #[inline]
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// Publishes the slot, making its value visible to the consumer.
    ///
    /// Advances the write cursor by one with a Release store; the consumer's
    /// Acquire load in `peek` then observes the fully populated slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot was never populated via
    /// [`write`](WriteSlot::write). Publishing an uninitialized slot would
    /// hand the consumer garbage, so this fails fast instead. Slots
    /// populated through [`as_mut_ptr`](WriteSlot::as_mut_ptr) must use
    /// [`commit_unchecked`](WriteSlot::commit_unchecked).
    pub fn commit(self) {
        assert!(self.written, "commit on an unpopulated slot");
        let ring = self.ring;
        // The value now belongs to the ring; skip the abandon cleanup.
        std::mem::forget(self);
        ring.commit_claimed();
    }

    /// Publishes the slot without checking that it was populated.
    ///
    /// This is the commit path for claims populated in place through
    /// [`as_mut_ptr`](WriteSlot::as_mut_ptr).
    ///
    /// # Safety
    ///
    /// The caller must have fully initialized the slot's value before
    /// calling this; publishing an uninitialized or partially initialized
    /// slot hands the consumer garbage.
    pub unsafe fn commit_unchecked(self) {
        let ring = self.ring;
        // The value now belongs to the ring; skip the abandon cleanup.
        std::mem::forget(self);
        ring.commit_claimed();
    }
}

impl<T> Drop for WriteSlot<'_, T> {
    fn drop(&mut self) {
        if self.written {
            // Claim abandoned after writing: the value was never published,
            // so the producer side still owns it and must drop it.
            // SAFETY: written implies the slot holds an initialized value.
            unsafe { self.slot.assume_init_drop() };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{channel, Config};

    #[test]
    fn test_commit_publishes_exactly_once() {
        let (mut producer, consumer) = channel::<u64>(Config::new(2));

        let mut slot = producer.claim_for_write().unwrap();
        assert!(!slot.is_written());
        slot.write(5);
        assert!(slot.is_written());
        slot.commit();

        assert_eq!(consumer.len(), 1);
    }

    #[test]
    #[should_panic(expected = "commit on an unpopulated slot")]
    fn test_commit_unwritten_panics() {
        let (mut producer, _consumer) = channel::<u64>(Config::new(2));
        let slot = producer.claim_for_write().unwrap();
        slot.commit();
    }

    #[test]
    fn test_populate_in_place_via_raw_pointer() {
        let (mut producer, mut consumer) = channel::<(u64, u64)>(Config::new(2));

        let mut slot = producer.claim_for_write().unwrap();
        let record = slot.as_mut_ptr();
        // SAFETY: both fields are written before the unchecked commit
        unsafe {
            std::ptr::addr_of_mut!((*record).0).write(7);
            std::ptr::addr_of_mut!((*record).1).write(8);
            slot.commit_unchecked();
        }

        assert_eq!(consumer.try_pop(), Some((7, 8)));
    }

    #[test]
    fn test_rewrite_drops_first_value() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

        struct DropTracker;

        impl Drop for DropTracker {
            fn drop(&mut self) {
                DROP_COUNT.fetch_add(1, Ordering::SeqCst);
            }
        }

        DROP_COUNT.store(0, Ordering::SeqCst);

        let (mut producer, mut consumer) = channel::<DropTracker>(Config::new(2));
        let mut slot = producer.claim_for_write().unwrap();
        slot.write(DropTracker);
        slot.write(DropTracker); // replaces, dropping the first
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 1);
        slot.commit();

        assert!(consumer.peek().is_some());
        consumer.pop();
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_abandoned_written_claim_drops_value() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

        struct DropTracker;

        impl Drop for DropTracker {
            fn drop(&mut self) {
                DROP_COUNT.fetch_add(1, Ordering::SeqCst);
            }
        }

        DROP_COUNT.store(0, Ordering::SeqCst);

        let (mut producer, consumer) = channel::<DropTracker>(Config::new(2));
        {
            let mut slot = producer.claim_for_write().unwrap();
            slot.write(DropTracker);
        }
        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 1);
        assert!(consumer.is_empty());
    }
}
