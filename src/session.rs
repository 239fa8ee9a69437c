use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Idle,
    Running,
    Finished,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TerminationReason {
    Win,
    Lose,
    Paused,
    Timeout,
}

/// Fixed-period timer driven by the caller's clock. Owned by the game as an
/// `Option`, so cancelling is just dropping it.
#[derive(Debug, Clone)]
pub struct Countdown {
    period: Duration,
    next_fire: Instant,
}

impl Countdown {
    pub fn start(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_fire: now + period,
        }
    }

    pub fn every_second(now: Instant) -> Self {
        Self::start(Duration::from_secs(1), now)
    }

    /// Number of periods that have elapsed since the last call, advancing
    /// the schedule past them. A zero period never fires.
    pub fn due(&mut self, now: Instant) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        let mut fired = 0;
        while now >= self.next_fire {
            self.next_fire += self.period;
            fired += 1;
        }
        fired
    }
}
