use crate::ring::Ring;
use crate::slot::WriteSlot;
use crate::Config;
use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::Arc;

/// Creates a ring buffer and splits it into its producer and consumer
/// halves.
///
/// Each half is the only way to drive its side of the cursor protocol, so
/// the single-producer single-consumer discipline is enforced by ownership:
/// move the `Producer` to the writing thread and the `Consumer` to the
/// reading thread, and the ring's single-writer invariants hold by
/// construction. The storage is freed when both halves are dropped.
///
/// # Example
///
/// ```
/// use spscring::{channel, Config};
///
/// let (mut producer, mut consumer) = channel::<u64>(Config::default());
///
/// assert!(producer.try_push(42));
/// assert_eq!(consumer.peek(), Some(&42));
/// consumer.pop();
/// assert_eq!(consumer.try_pop(), None);
/// ```
pub fn channel<T>(config: Config) -> (Producer<T>, Consumer<T>) {
    let ring = Arc::new(Ring::new(config));
    (
        Producer {
            ring: Arc::clone(&ring),
            _not_sync: PhantomData,
        },
        Consumer {
            ring,
            _not_sync: PhantomData,
        },
    )
}

/// The writing half of the ring.
///
/// Exactly one `Producer` exists per ring. The claim and push methods take
/// `&mut self`, so the borrow checker guarantees at most one outstanding
/// [`WriteSlot`] and rejects concurrent producer calls at compile time.
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
    /// Producer calls mutate the ring's producer-side cursor cache, so the
    /// handle is Send but deliberately not Sync.
    _not_sync: PhantomData<Cell<()>>,
}

impl<T> Producer<T> {
    /// Claims the next unused slot for writing. Returns `None` if the ring
    /// is full.
    ///
    /// Claiming does not advance the write cursor: the slot stays invisible
    /// to the consumer until [`WriteSlot::commit`] publishes it. An
    /// abandoned claim (the `WriteSlot` dropped without committing) is
    /// handed out again by the next call.
    ///
    /// The returned slot mutably borrows this handle, so a second claim
    /// while one is outstanding does not compile:
    ///
    /// ```compile_fail
    /// use spscring::{channel, Config};
    ///
    /// let (mut producer, _consumer) = channel::<u64>(Config::default());
    /// let mut first = producer.claim_for_write().unwrap();
    /// let second = producer.claim_for_write(); // ERROR: second mutable borrow
    /// first.write(1);
    /// ```
    #[inline]
    pub fn claim_for_write(&mut self) -> Option<WriteSlot<'_, T>> {
        self.ring.claim_for_write()
    }

    /// Claim + populate + commit in one call (convenience).
    ///
    /// Returns `true` if the value was enqueued, `false` if the ring is full
    /// (in which case the value is dropped).
    #[inline]
    pub fn try_push(&mut self, value: T) -> bool {
        self.ring.try_push(value)
    }

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Returns the current number of committed, unpopped items.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns true if the ring is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns true if the ring is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

/// The reading half of the ring.
///
/// Exactly one `Consumer` exists per ring. [`peek`](Consumer::peek) borrows
/// the handle shared and [`pop`](Consumer::pop) borrows it mutably, so a
/// peeked reference can never survive the pop that frees its slot.
pub struct Consumer<T> {
    ring: Arc<Ring<T>>,
    /// Consumer calls mutate the ring's consumer-side cursor cache, so the
    /// handle is Send but deliberately not Sync.
    _not_sync: PhantomData<Cell<()>>,
}

impl<T> Consumer<T> {
    /// Returns a reference to the oldest committed slot, or `None` if the
    /// ring is empty.
    ///
    /// Peeking has no side effects and may be repeated. The reference
    /// borrows this handle, so holding it across the [`pop`](Consumer::pop)
    /// that releases the slot does not compile:
    ///
    /// ```compile_fail
    /// use spscring::{channel, Config};
    ///
    /// let (mut producer, mut consumer) = channel::<u64>(Config::default());
    /// producer.try_push(1);
    /// let peeked = consumer.peek().unwrap();
    /// consumer.pop(); // ERROR: cannot borrow `consumer` as mutable
    /// println!("{peeked}");
    /// ```
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.ring.peek()
    }

    /// Releases the oldest committed slot, dropping its value in place and
    /// returning the slot to the producer.
    ///
    /// Must be preceded by a successful [`peek`](Consumer::peek).
    ///
    /// # Panics
    ///
    /// Panics if no committed slot is known to be available, i.e. `pop` was
    /// called without a prior successful `peek`.
    #[inline]
    pub fn pop(&mut self) {
        self.ring.pop();
    }

    /// Peek + move out + release in one call (convenience).
    ///
    /// Returns ownership of the oldest committed value, or `None` if the
    /// ring is empty.
    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        self.ring.try_pop()
    }

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Returns the current number of committed, unpopped items.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns true if the ring is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns true if the ring is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}
