use core::alloc::Layout;
use core::fmt;

/// The error type for operations that may grow a table.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The requested bucket count or its byte size does not fit in `usize`.
    CapacityOverflow,

    /// The memory allocator returned an error.
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },

    /// Growing the table would not shorten its probe sequences.
    ///
    /// Raised when elements keep landing at the maximum probe distance even
    /// though the table is far below its load limit, which happens when the
    /// hash function maps many keys to the same few buckets.
    ProbeOverflow,
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryReserveError::CapacityOverflow => f.write_str("hash table capacity overflow"),
            TryReserveError::AllocError { layout } => write!(
                f,
                "memory allocation of {} bytes failed",
                layout.size()
            ),
            TryReserveError::ProbeOverflow => f.write_str(
                "hash table probe distance overflow, the hash function collapses too many keys",
            ),
        }
    }
}

impl core::error::Error for TryReserveError {}

/// Whether a failure is reported to the caller or raised as a panic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Fallibility {
    Fallible,
    Infallible,
}

impl Fallibility {
    #[cold]
    #[inline(never)]
    pub(crate) fn capacity_overflow(self) -> TryReserveError {
        match self {
            Fallibility::Fallible => TryReserveError::CapacityOverflow,
            Fallibility::Infallible => panic!("hash table capacity overflow"),
        }
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn alloc_err(self, layout: Layout) -> TryReserveError {
        match self {
            Fallibility::Fallible => TryReserveError::AllocError { layout },
            Fallibility::Infallible => alloc::alloc::handle_alloc_error(layout),
        }
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn probe_overflow(self) -> TryReserveError {
        match self {
            Fallibility::Fallible => TryReserveError::ProbeOverflow,
            Fallibility::Infallible => panic!("{}", TryReserveError::ProbeOverflow),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn fallible_reports() {
        assert_eq!(
            Fallibility::Fallible.capacity_overflow(),
            TryReserveError::CapacityOverflow
        );
        assert_eq!(
            Fallibility::Fallible.probe_overflow(),
            TryReserveError::ProbeOverflow
        );
        let layout = Layout::new::<u64>();
        assert_eq!(
            Fallibility::Fallible.alloc_err(layout),
            TryReserveError::AllocError { layout }
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn infallible_capacity_overflow_panics() {
        let _ = Fallibility::Infallible.capacity_overflow();
    }

    #[test]
    #[should_panic(expected = "probe distance overflow")]
    fn infallible_probe_overflow_panics() {
        let _ = Fallibility::Infallible.probe_overflow();
    }

    #[test]
    fn display() {
        assert_eq!(
            TryReserveError::CapacityOverflow.to_string(),
            "hash table capacity overflow"
        );
        assert_eq!(
            TryReserveError::AllocError {
                layout: Layout::new::<[u8; 64]>()
            }
            .to_string(),
            "memory allocation of 64 bytes failed"
        );
    }
}
