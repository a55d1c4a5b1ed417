use time::macros::datetime;
use time::{OffsetDateTime, UtcOffset};

/// Anything before this instant means the wall clock was never set.
const EARLIEST_SYNCED: OffsetDateTime = datetime!(2016-01-01 0:00 UTC);

/// Source of local wall-clock time.
pub trait Clock {
    /// Current local time, or `None` while the clock is unsynchronized.
    fn now(&self) -> Option<OffsetDateTime>;
}

/// System clock shifted into a fixed local offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    fn localize(&self, utc: OffsetDateTime) -> Option<OffsetDateTime> {
        (utc >= EARLIEST_SYNCED).then(|| utc.to_offset(self.offset))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Option<OffsetDateTime> {
        self.localize(OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn unset_clock_is_unsynchronized() {
        let clock = SystemClock::new(offset!(+5:30));
        assert_eq!(clock.localize(OffsetDateTime::UNIX_EPOCH), None);
    }

    #[test]
    fn synced_clock_is_shifted_to_local_offset() {
        let clock = SystemClock::new(offset!(+5:30));
        let local = clock.localize(datetime!(2024-06-01 12:00 UTC)).unwrap();

        assert_eq!(local.offset(), offset!(+5:30));
        assert_eq!(local.hour(), 17);
        assert_eq!(local.minute(), 30);
    }
}
