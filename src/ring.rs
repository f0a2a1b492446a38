use crate::invariants::{
    debug_assert_bounded_count, debug_assert_initialized_read, debug_assert_monotonic,
    debug_assert_read_not_past_write,
};
use crate::slot::WriteSlot;
use crate::Config;
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// This SPSC ring buffer uses a two-phase write protocol (claim, then commit)
// with the minimal fence placement a single-producer single-consumer queue
// needs:
//
// ## Sequence Numbers
//
// `write_cursor` and `read_cursor` are unbounded u64 sequence numbers, not
// wrapped indices. The physical slot is computed as `cursor & mask` only when
// touching storage, so full and empty are always distinguishable and the ABA
// problem cannot arise (at 10 billion messages/second, u64 wrap takes ~58
// years).
//
// ## Memory Ordering Protocol
//
// **Producer (claim + commit):**
// 1. Load `write_cursor` with Relaxed (only the producer writes it)
// 2. Check `cached_read_cursor` with no ordering (UnsafeCell, single-writer)
// 3. If cache insufficient: Load `read_cursor` with Acquire (synchronizes
//    with the consumer's Release store in pop)
// 4. Write the claimed slot (no ordering needed - protected by protocol)
// 5. Store `write_cursor` with Release (publishes the slot to the consumer)
//
// **Consumer (peek + pop):**
// 1. Load `read_cursor` with Relaxed (only the consumer writes it)
// 2. Check `cached_write_cursor` with no ordering (UnsafeCell, single-writer)
// 3. If cache insufficient: Load `write_cursor` with Acquire (synchronizes
//    with the producer's Release store in commit)
// 4. Read the slot (no ordering needed - protected by protocol)
// 5. Store `read_cursor` with Release (returns the slot to the producer)
//
// The Release/Acquire pair on `write_cursor` guarantees every write to a slot
// that happened before commit is visible to a consumer whose peek observed the
// new cursor value. The Release/Acquire pair on `read_cursor` guarantees the
// producer never reuses a slot before the consumer has released it. No other
// ordering is provided or needed.
//
// ## Single-Writer Invariants
//
// The following fields are accessed via UnsafeCell without atomics because
// they have exactly one writer:
// - `cached_read_cursor`: written and read only by the producer
// - `cached_write_cursor`: written and read only by the consumer
// - `storage[idx]`: written by the producer (between claim and commit),
//   read by the consumer (between peek and pop)
//
// These invariants hold only under the SPSC contract: exactly one thread
// calls the producer methods and exactly one thread calls the consumer
// methods for the lifetime of the ring.
//
// =============================================================================

/// Wait-free single-producer single-consumer ring buffer core.
///
/// The producer claims a slot with [`claim_for_write`](Ring::claim_for_write),
/// populates it, and publishes it by committing the returned [`WriteSlot`].
/// The consumer inspects the oldest committed slot with [`peek`](Ring::peek)
/// and releases it with [`pop`](Ring::pop). Every operation completes in a
/// bounded number of steps; full and empty are ordinary outcomes the caller
/// retries around, never errors.
///
/// Optimized with:
/// - cache-padded cursors so producer and consumer cores never false-share
/// - cached remote cursors so the cross-core acquire load happens only when
///   the local snapshot is insufficient
///
/// # SPSC contract
///
/// This type is crate-internal: the public surface is the
/// [`Producer`](crate::Producer)/[`Consumer`](crate::Consumer) pair from
/// [`channel`](crate::channel), whose ownership and `&mut self` receivers
/// make the single-writer discipline below a compile-time guarantee (one
/// claim outstanding at a time, no peeked reference surviving the pop that
/// frees its slot). Code inside this crate that calls `Ring` directly must
/// uphold the discipline by hand: one thread drives the producer methods,
/// one thread the consumer methods, and the ring is dropped only after
/// both threads are done.
pub(crate) struct Ring<T> {
    // === PRODUCER HOT ===
    /// Write cursor: slots ever committed (written by producer, read by consumer)
    write_cursor: CachePadded<AtomicU64>,
    /// Producer's cached view of the read cursor (avoids cross-core reads)
    cached_read_cursor: CachePadded<UnsafeCell<u64>>,

    // === CONSUMER HOT ===
    /// Read cursor: slots ever released (written by consumer, read by producer)
    read_cursor: CachePadded<AtomicU64>,
    /// Consumer's cached view of the write cursor (avoids cross-core reads)
    cached_write_cursor: CachePadded<UnsafeCell<u64>>,

    // === CONFIG ===
    config: Config,

    // === SLOT STORAGE ===
    /// Fixed at construction, exclusively owned by the ring. `Box<[_]>`
    /// rather than `Vec<_>` because the storage never grows or shrinks.
    storage: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// Safety: Ring is Send + Sync as long as T is Send. The Release/Acquire
// cursor protocol above synchronizes all slot accesses between the single
// producer thread and the single consumer thread.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T> Ring<T> {
    /// Creates a new ring buffer with the given configuration.
    ///
    /// Both cursors start at zero and the slots are left uninitialized; a
    /// slot becomes meaningful only once a claim for it is committed. This is
    /// the only allocation the ring ever performs.
    pub fn new(config: Config) -> Self {
        let capacity = config.capacity();

        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, || UnsafeCell::new(MaybeUninit::uninit()));
        let storage = storage.into_boxed_slice();

        Self {
            write_cursor: CachePadded::new(AtomicU64::new(0)),
            cached_read_cursor: CachePadded::new(UnsafeCell::new(0)),
            read_cursor: CachePadded::new(AtomicU64::new(0)),
            cached_write_cursor: CachePadded::new(UnsafeCell::new(0)),
            config,
            storage,
        }
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    /// Returns the index mask for wrapping.
    #[inline]
    fn mask(&self) -> usize {
        self.config.mask()
    }

    /// Returns the current number of committed, unpopped items.
    ///
    /// Advisory when read from a third thread; exact on the producer or
    /// consumer thread.
    #[inline]
    pub fn len(&self) -> usize {
        let write = self.write_cursor.load(Ordering::Relaxed);
        let read = self.read_cursor.load(Ordering::Relaxed);
        write.wrapping_sub(read) as usize
    }

    /// Returns true if the ring is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write_cursor.load(Ordering::Relaxed) == self.read_cursor.load(Ordering::Relaxed)
    }

    /// Returns true if the ring is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Claims the next unused slot for writing. Returns `None` if the ring
    /// is full.
    ///
    /// Claiming does not advance the write cursor: the slot stays invisible
    /// to the consumer until [`WriteSlot::commit`] publishes it. An abandoned
    /// claim (the `WriteSlot` dropped without committing) is handed out again
    /// by the next call.
    ///
    /// Fast path checks the producer's cached read cursor; the cross-core
    /// acquire load happens only when the cache says the ring looks full.
    ///
    /// Producer side; one claim outstanding at a time.
    pub fn claim_for_write(&self) -> Option<WriteSlot<'_, T>> {
        let write = self.write_cursor.load(Ordering::Relaxed);

        // Fast path: check cached read cursor
        // SAFETY: cached_read_cursor is only written by the producer (this
        // code path). No other thread touches it, so this unsynchronized
        // read is safe.
        let cached_read = unsafe { *self.cached_read_cursor.get() };

        if write.wrapping_sub(cached_read) as usize >= self.capacity() {
            // Slow path: refresh the cache from the consumer
            let read = self.read_cursor.load(Ordering::Acquire);
            // SAFETY: cached_read_cursor is only written by the producer.
            // The Acquire load above synchronizes with the consumer's
            // Release store in pop().
            unsafe { *self.cached_read_cursor.get() = read };

            if write.wrapping_sub(read) as usize >= self.capacity() {
                return None;
            }
        }

        let idx = (write as usize) & self.mask();
        // SAFETY: Slot access is safe because:
        // 1. idx is within bounds (masked to capacity)
        // 2. The fullness check above proved this slot is not in the
        //    committed window [read_cursor, write_cursor), so the consumer
        //    will not read it
        // 3. Only the producer writes slots at or beyond write_cursor, and
        //    the caller holds at most one claim at a time
        let slot = unsafe { &mut *self.storage[idx].get() };

        Some(WriteSlot::new(slot, self))
    }

    /// Internal: advance the write cursor by one with Release, publishing
    /// the claimed slot. Called by [`WriteSlot::commit`].
    pub(crate) fn commit_claimed(&self) {
        let write = self.write_cursor.load(Ordering::Relaxed);
        let new_write = write.wrapping_add(1);
        let read = self.read_cursor.load(Ordering::Relaxed);

        debug_assert_bounded_count!(new_write.wrapping_sub(read) as usize, self.capacity());
        debug_assert_monotonic!("write_cursor", write, new_write);

        self.write_cursor.store(new_write, Ordering::Release);
    }

    /// Claim + populate + commit in one call (convenience).
    ///
    /// Returns `true` if the value was enqueued, `false` if the ring is full
    /// (in which case the value is dropped).
    #[inline]
    pub fn try_push(&self, value: T) -> bool {
        match self.claim_for_write() {
            Some(mut slot) => {
                slot.write(value);
                slot.commit();
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Returns a reference to the oldest committed slot, or `None` if the
    /// ring is empty.
    ///
    /// Peeking has no side effects and may be repeated; the slot is released
    /// only by [`pop`](Ring::pop), which must not run while the returned
    /// reference is live (the public `Consumer` handle encodes this in its
    /// borrows).
    ///
    /// Consumer side.
    pub fn peek(&self) -> Option<&T> {
        let read = self.read_cursor.load(Ordering::Relaxed);

        // Fast path: check cached write cursor
        // SAFETY: cached_write_cursor is only written by the consumer (this
        // code path). No other thread touches it, so this unsynchronized
        // read is safe.
        let mut write = unsafe { *self.cached_write_cursor.get() };

        if write == read {
            // Slow path: refresh the cache from the producer
            write = self.write_cursor.load(Ordering::Acquire);
            // SAFETY: cached_write_cursor is only written by the consumer.
            // The Acquire load above synchronizes with the producer's
            // Release store in commit_claimed().
            unsafe { *self.cached_write_cursor.get() = write };

            if write == read {
                return None;
            }
        }

        debug_assert_initialized_read!(read, write);

        let idx = (read as usize) & self.mask();
        // SAFETY: Slot access is safe because:
        // 1. idx is within bounds (masked to capacity)
        // 2. read < write, so the slot was fully written and published by
        //    the producer's Release store; the Acquire load synchronized
        //    with it
        // 3. The producer will not overwrite the slot until the read cursor
        //    advances past it
        unsafe { Some((*self.storage[idx].get()).assume_init_ref()) }
    }

    /// Releases the oldest committed slot, dropping its value in place and
    /// advancing the read cursor with Release.
    ///
    /// Must be preceded by a successful [`peek`](Ring::peek) on the consumer
    /// thread.
    ///
    /// # Panics
    ///
    /// Panics if no committed slot is known to be available, i.e. `pop` was
    /// called without a prior successful `peek`. Failing fast here is
    /// deliberate: advancing the read cursor past the write cursor would
    /// corrupt the queue unrecoverably.
    pub fn pop(&self) {
        let read = self.read_cursor.load(Ordering::Relaxed);

        // A successful peek() always leaves cached_write_cursor ahead of the
        // read cursor, so this check is a plain local comparison.
        // SAFETY: cached_write_cursor is only written by the consumer.
        let write = unsafe { *self.cached_write_cursor.get() };
        assert!(
            write != read,
            "pop() without a prior successful peek() on an empty ring"
        );

        let new_read = read.wrapping_add(1);
        debug_assert_read_not_past_write!(new_read, write);
        debug_assert_monotonic!("read_cursor", read, new_read);

        let idx = (read as usize) & self.mask();
        // SAFETY: read < write, so the slot holds an initialized value the
        // consumer exclusively owns. Dropping it in place before the Release
        // store keeps the drop ordered before any producer reuse.
        unsafe { ptr::drop_in_place((*self.storage[idx].get()).as_mut_ptr()) };

        self.read_cursor.store(new_read, Ordering::Release);
    }

    /// Peek + move out + release in one call (convenience).
    ///
    /// Returns ownership of the oldest committed value, or `None` if the
    /// ring is empty.
    pub fn try_pop(&self) -> Option<T> {
        let read = self.read_cursor.load(Ordering::Relaxed);

        // SAFETY: cached_write_cursor is only written by the consumer.
        let mut write = unsafe { *self.cached_write_cursor.get() };

        if write == read {
            write = self.write_cursor.load(Ordering::Acquire);
            // SAFETY: see peek() - consumer-owned cache, Acquire pairs with
            // the producer's Release.
            unsafe { *self.cached_write_cursor.get() = write };

            if write == read {
                return None;
            }
        }

        debug_assert_initialized_read!(read, write);

        let new_read = read.wrapping_add(1);
        debug_assert_read_not_past_write!(new_read, write);

        let idx = (read as usize) & self.mask();
        // SAFETY: read < write, so the slot is initialized and exclusively
        // owned by the consumer; assume_init_read moves the value out before
        // the Release store lets the producer reuse the slot.
        let value = unsafe { (*self.storage[idx].get()).assume_init_read() };

        self.read_cursor.store(new_read, Ordering::Release);
        Some(value)
    }
}

impl<T> Drop for Ring<T> {
    fn drop(&mut self) {
        // Drop every committed, unpopped item
        let write = self.write_cursor.load(Ordering::Relaxed);
        let read = self.read_cursor.load(Ordering::Relaxed);
        let count = write.wrapping_sub(read) as usize;

        let mask = self.mask();
        for i in 0..count {
            let idx = ((read as usize).wrapping_add(i)) & mask;
            unsafe {
                ptr::drop_in_place(self.storage[idx].get_mut().as_mut_ptr());
            }
        }
    }
}
