//! Receive overrun tracking.
//!
//! The serializer raises `INTFLAG.RXORn` when a new word lands in `DATAn`
//! before the previous one was read. The blocking read path is polled, so
//! an application that stalls between reads loses samples silently; this
//! module keeps a sticky record of that so the caller can decide whether to
//! discard the buffer being filled.
//!
//! Overruns do not stop capture. The serializer keeps running and later
//! reads return fresh words, so the monitor never blocks the read path.
//!
//! # Usage Pattern
//!
//! ```rust,ignore
//! mic.read_into(&mut block)?;
//! if let Some(n) = mic.overruns() {
//!     warn!("dropped PDM words {} times", n);
//!     mic.clear_overruns();
//!     continue; // decimator state is stale
//! }
//! ```

/// Sticky overrun state for one serializer.
///
/// `count` saturates at [`u16::MAX`] so a long stall cannot wrap it back to
/// a small number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverrunMonitor {
    /// No overrun since the last clear.
    #[default]
    Clean,
    /// At least one overrun since the last clear.
    Overrun {
        /// Number of reads that observed `RXORn`.
        count: u16,
    },
}

impl OverrunMonitor {
    /// Start in [`Clean`](Self::Clean).
    pub const fn new() -> Self {
        Self::Clean
    }

    /// Record the outcome of one read.
    ///
    /// `overrun` is whether `RXORn` was set when the word was taken.
    pub fn on_read(&mut self, overrun: bool) {
        if !overrun {
            return;
        }
        *self = Self::Overrun {
            count: match *self {
                Self::Overrun { count } => count.saturating_add(1),
                Self::Clean => 1,
            },
        };
    }

    /// Overrun count since the last clear, `None` if clean.
    pub fn count(&self) -> Option<u16> {
        match *self {
            Self::Clean => None,
            Self::Overrun { count } => Some(count),
        }
    }

    /// `true` if any overrun was recorded since the last clear.
    pub fn has_overrun(&self) -> bool {
        matches!(self, Self::Overrun { .. })
    }

    /// Forget recorded overruns.
    pub fn clear(&mut self) {
        *self = Self::Clean;
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let m = OverrunMonitor::new();
        assert!(!m.has_overrun());
        assert_eq!(m.count(), None);
    }

    #[test]
    fn clean_reads_change_nothing() {
        let mut m = OverrunMonitor::new();
        m.on_read(false);
        m.on_read(false);
        assert_eq!(m, OverrunMonitor::Clean);
    }

    #[test]
    fn counts_overruns_until_cleared() {
        let mut m = OverrunMonitor::new();
        m.on_read(true);
        m.on_read(false);
        m.on_read(true);
        assert_eq!(m.count(), Some(2));

        m.clear();
        assert!(!m.has_overrun());
    }

    /// A long stall must not wrap the counter back to a small value.
    #[test]
    fn count_saturates() {
        let mut m = OverrunMonitor::Overrun {
            count: u16::MAX - 1,
        };
        m.on_read(true);
        m.on_read(true);
        assert_eq!(m.count(), Some(u16::MAX));
    }
}
