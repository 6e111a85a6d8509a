use time::{Date, OffsetDateTime, UtcOffset};

/// Source of "today" and of the local offset used for human-readable timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> Date {
        self.now().date()
    }

    /// Local offset in force at `instant`, which may differ from today's across DST changes.
    fn offset_at(&self, _instant: OffsetDateTime) -> UtcOffset {
        self.now().offset()
    }
}

/// Wall clock in the local timezone.
///
/// Falls back to UTC when the platform cannot determine the local offset
/// (e.g. multi-threaded processes on some Unix targets).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| {
            tracing::debug!("local offset unavailable, using UTC");
            OffsetDateTime::now_utc()
        })
    }

    fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        UtcOffset::local_offset_at(instant).unwrap_or_else(|_| self.now().offset())
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
