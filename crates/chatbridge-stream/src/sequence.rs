//! Per-stream event sequence counter.

/// Hands out `sequence_number`s: 0, 1, 2, … with no gaps.
///
/// One counter per stream, owned by the translator. It never resets.
#[derive(Debug, Default)]
pub struct SequenceNumber {
    next: u64,
}

impl SequenceNumber {
    /// Counter starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current value, then increment.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        let current = self.next;
        self.next += 1;
        current
    }

    /// Number of values handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_increments() {
        let mut seq = SequenceNumber::new();
        assert_eq!(seq.next(), 0);
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.issued(), 3);
    }

    #[test]
    fn fresh_counter_has_issued_nothing() {
        assert_eq!(SequenceNumber::default().issued(), 0);
    }
}
