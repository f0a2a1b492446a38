use thiserror::Error;

/// Error returned when a requested capacity cannot back a ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity must be non-zero.
    #[error("ring capacity must be non-zero")]
    ZeroCapacity,
    /// Capacity must be a power of two so index wrapping is a bitmask.
    #[error("ring capacity {0} is not a power of two")]
    CapacityNotPowerOfTwo(usize),
}

/// Configuration for a ring created with [`channel`](crate::channel).
///
/// Capacity is stored as a power-of-two bit count, so a `Config` can never
/// describe a capacity that breaks the bitmask index-wrapping invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Ring buffer size as a power of 2 (default: 10 = 1024 slots)
    pub capacity_bits: u8,
}

impl Config {
    /// Creates a configuration with `2^capacity_bits` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_bits` does not fit a `usize` capacity.
    pub fn new(capacity_bits: u8) -> Self {
        assert!(
            u32::from(capacity_bits) < usize::BITS,
            "capacity_bits {capacity_bits} overflows usize"
        );
        Self { capacity_bits }
    }

    /// Creates a configuration from an explicit slot count.
    ///
    /// The count must be a non-zero power of two; anything else is rejected
    /// rather than silently rounded.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !capacity.is_power_of_two() {
            return Err(ConfigError::CapacityNotPowerOfTwo(capacity));
        }
        Ok(Self {
            capacity_bits: capacity.trailing_zeros() as u8,
        })
    }

    /// Returns the number of slots in the ring.
    #[inline]
    pub const fn capacity(&self) -> usize {
        1 << self.capacity_bits
    }

    /// Returns the mask for index wrapping.
    #[inline]
    pub const fn mask(&self) -> usize {
        self.capacity() - 1
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { capacity_bits: 10 } // 1024 slots
    }
}

/// Low latency configuration (1K slots, hot set fits in L1 cache)
pub const LOW_LATENCY_CONFIG: Config = Config { capacity_bits: 10 };

/// High throughput configuration (64K slots, absorbs large producer bursts)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config { capacity_bits: 16 };
