use std::{fmt::Display, time::Duration};

pub const NANOS_PER_SEC: u32 = 1_000_000_000;
const NANOS_PER_MILLI: u32 = 1_000_000;

/// A `(seconds, nanoseconds)` pair used both for points in time and for durations.
///
/// Nanoseconds are always kept in `[0, 1_000_000_000)`, so the derived ordering is the numeric
/// one. Seconds are signed which lets subtraction produce a negative value. Whoever consumes the
/// result decides what to do with it, usually through [Interval::saturating_sub].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Interval {
    secs: i64,
    nanos: u32,
}

impl Interval {
    pub const ZERO: Interval = Interval { secs: 0, nanos: 0 };
    pub const ONE_SECOND: Interval = Interval { secs: 1, nanos: 0 };

    pub fn new(secs: i64, nanos: u32) -> Option<Self> {
        if nanos >= NANOS_PER_SEC {
            None
        } else {
            Some(Self { secs, nanos })
        }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self { secs, nanos: 0 }
    }

    pub const fn from_millis(millis: u32) -> Self {
        Self {
            secs: (millis / 1000) as i64,
            nanos: (millis % 1000) * NANOS_PER_MILLI,
        }
    }

    pub fn secs(&self) -> i64 {
        self.secs
    }

    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    pub fn is_negative(&self) -> bool {
        self.secs < 0
    }

    /// Computes `self - rhs`. The flag is set when the seconds arithmetic overflowed, in which
    /// case the returned value is wrapped and must not be used.
    pub fn overflowing_sub(self, rhs: Interval) -> (Interval, bool) {
        let mut overflow = false;
        let mut secs = self.secs;
        let mut nanos = self.nanos;
        if nanos < rhs.nanos {
            nanos += NANOS_PER_SEC;
            let (borrowed, o) = secs.overflowing_sub(1);
            secs = borrowed;
            overflow |= o;
        }
        nanos -= rhs.nanos;
        let (secs, o) = secs.overflowing_sub(rhs.secs);
        overflow |= o;
        (Interval { secs, nanos }, overflow)
    }

    /// Computes `self - rhs`, clamping to [Interval::ZERO] when the result is negative or can't
    /// be represented.
    pub fn saturating_sub(self, rhs: Interval) -> Interval {
        match self.overflowing_sub(rhs) {
            (value, false) if !value.is_negative() => value,
            _ => Interval::ZERO,
        }
    }

    /// Negative intervals become [Duration::ZERO].
    pub fn to_duration(self) -> Duration {
        if self.is_negative() {
            Duration::ZERO
        } else {
            Duration::new(self.secs as u64, self.nanos)
        }
    }

    /// Formats with millisecond precision, e.g. `312.045s`.
    pub fn display_millis(&self) -> impl Display + '_ {
        MillisDisplay(self)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09}s", self.secs, self.nanos)
    }
}

struct MillisDisplay<'a>(&'a Interval);

impl Display for MillisDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:03}s", self.0.secs, self.0.nanos / NANOS_PER_MILLI)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Interval, NANOS_PER_SEC};

    fn interval(secs: i64, nanos: u32) -> Interval {
        Interval::new(secs, nanos).unwrap()
    }

    #[test]
    fn test_new_rejects_unnormalized_nanos() {
        assert!(Interval::new(1, NANOS_PER_SEC).is_none());
        assert!(Interval::new(1, NANOS_PER_SEC - 1).is_some());
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(Interval::from_millis(312_045), interval(312, 45_000_000));
        assert_eq!(Interval::from_millis(999), interval(0, 999_000_000));
        assert_eq!(Interval::from_millis(0), Interval::ZERO);
    }

    #[test]
    fn test_sub_with_borrow() {
        let (value, overflow) = interval(5, 100).overflowing_sub(interval(2, 200));
        assert!(!overflow);
        assert_eq!(value, interval(2, NANOS_PER_SEC - 100));
    }

    #[test]
    fn test_saturating_sub_exact_when_not_smaller() {
        let values = [
            interval(0, 0),
            interval(0, 1),
            interval(0, 999_999_999),
            interval(1, 0),
            interval(299, 500_000_000),
            interval(300, 0),
            interval(1_700_000_000, 123_456_789),
        ];
        for a in values {
            for b in values.iter().copied().filter(|b| *b <= a) {
                let difference = a.saturating_sub(b);
                assert!(!difference.is_negative(), "{a} - {b}");
                assert_eq!(
                    a.to_duration() - b.to_duration(),
                    difference.to_duration(),
                    "{a} - {b}"
                );
            }
        }
    }

    #[test]
    fn test_saturating_sub_clamps_negative() {
        assert_eq!(interval(1, 0).saturating_sub(interval(1, 1)), Interval::ZERO);
        assert_eq!(interval(0, 0).saturating_sub(interval(300, 0)), Interval::ZERO);
        assert_eq!(
            Interval::from_secs(300).saturating_sub(Interval::from_millis(310_000)),
            Interval::ZERO
        );
    }

    #[test]
    fn test_overflow_is_detected() {
        let (_, overflow) = interval(i64::MIN, 0).overflowing_sub(interval(0, 1));
        assert!(overflow);
        let (_, overflow) = interval(i64::MAX, 0).overflowing_sub(interval(-1, 0));
        assert!(overflow);
        assert_eq!(
            interval(i64::MAX, 0).saturating_sub(interval(-1, 0)),
            Interval::ZERO
        );
    }

    #[test]
    fn test_to_duration() {
        assert_eq!(interval(50, 5).to_duration(), Duration::new(50, 5));
        assert_eq!(interval(-1, 5).to_duration(), Duration::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(interval(50, 5).to_string(), "50.000000005s");
        assert_eq!(interval(312, 45_000_000).display_millis().to_string(), "312.045s");
    }
}
