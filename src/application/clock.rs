//! Time and identifier sources injected into services.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::PostId;

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> PostId;
}

/// Wall clock in UTC, truncated to microseconds to match what Postgres keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let micros = now.nanosecond() / 1_000 * 1_000;
        now.replace_nanosecond(micros).unwrap_or(now)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> PostId {
        PostId::new(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_drops_sub_microsecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.nanosecond() % 1_000, 0);
        assert_eq!(now.offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn uuid_generator_yields_distinct_ids() {
        let first = UuidGenerator.next_id();
        let second = UuidGenerator.next_id();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }
}
