/// A single step of the interval clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Zero-based interval index.
    pub index: u64,
    /// Hour of day (0-23) in which the interval starts.
    pub hour: u32,
}

/// A simulation clock that walks fixed-length intervals over a horizon.
///
/// The clock covers `ceil(days * 24 * 60 / interval_minutes) + 1` intervals:
/// the extra trailing interval samples the boundary at the end of the
/// horizon.
///
/// # Examples
///
/// ```
/// use ev_concurrency_sim::sim::clock::IntervalClock;
///
/// let clock = IntervalClock::new(1, 15);
/// assert_eq!(clock.total(), 97);
///
/// let hours: Vec<u32> = clock.map(|tick| tick.hour).collect();
/// assert_eq!(hours[0], 0);
/// assert_eq!(hours[4], 1);
/// assert_eq!(hours[96], 0);
/// ```
#[derive(Debug, Clone)]
pub struct IntervalClock {
    /// Next interval to hand out
    current: u64,
    /// Total intervals in the horizon
    total: u64,
    interval_minutes: u32,
}

impl IntervalClock {
    /// Creates a clock for `days` days of `interval_minutes`-long intervals.
    ///
    /// # Panics
    ///
    /// Panics if `interval_minutes` is zero.
    pub fn new(days: u32, interval_minutes: u32) -> Self {
        assert!(interval_minutes > 0, "interval_minutes must be > 0");
        Self {
            current: 0,
            total: Self::total_intervals(days, interval_minutes),
            interval_minutes,
        }
    }

    /// Number of intervals covering `days` days, including the boundary interval.
    pub fn total_intervals(days: u32, interval_minutes: u32) -> u64 {
        let horizon_minutes = u64::from(days) * 24 * 60;
        horizon_minutes.div_ceil(u64::from(interval_minutes)) + 1
    }

    /// Hour of day in which interval `index` starts.
    pub fn hour_of(index: u64, interval_minutes: u32) -> u32 {
        ((index * u64::from(interval_minutes) / 60) % 24) as u32
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Intervals not yet handed out.
    pub fn remaining(&self) -> u64 {
        self.total - self.current
    }

    /// Advances the clock by one interval.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The interval before advancing
    /// * `None` - If the horizon is exhausted
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current < self.total {
            let index = self.current;
            self.current += 1;
            Some(Tick {
                index,
                hour: Self::hour_of(index, self.interval_minutes),
            })
        } else {
            None
        }
    }
}

impl Iterator for IntervalClock {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        self.tick()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}
