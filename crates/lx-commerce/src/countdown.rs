use std::time::Duration;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Zero-padded `DD HH MM SS` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownDisplay {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl CountdownDisplay {
    fn from_remaining(remaining_ms: i64) -> Self {
        Self {
            days: format!("{:02}", remaining_ms / DAY_MS),
            hours: format!("{:02}", remaining_ms % DAY_MS / HOUR_MS),
            minutes: format!("{:02}", remaining_ms % HOUR_MS / MINUTE_MS),
            seconds: format!("{:02}", remaining_ms % MINUTE_MS / SECOND_MS),
        }
    }

    fn expired() -> Self {
        Self::from_remaining(0)
    }

    /// `(element id, text)` pairs for the page.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("days", self.days.as_str()),
            ("hours", self.hours.as_str()),
            ("minutes", self.minutes.as_str()),
            ("seconds", self.seconds.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Running(CountdownDisplay),
    /// The deadline passed; show this and cancel the timer.
    Finished(CountdownDisplay),
}

impl Tick {
    pub fn display(&self) -> &CountdownDisplay {
        match self {
            Tick::Running(display) | Tick::Finished(display) => display,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    deadline_ms: i64,
}

impl Countdown {
    pub fn until(deadline_ms: i64) -> Self {
        Self { deadline_ms }
    }

    pub fn starting_at(now_ms: i64, horizon: Duration) -> Self {
        let horizon_ms = i64::try_from(horizon.as_millis()).unwrap_or(i64::MAX);
        Self::until(now_ms.saturating_add(horizon_ms))
    }

    pub fn tick(&self, now_ms: i64) -> Tick {
        let remaining = self.deadline_ms - now_ms;
        if remaining < 0 {
            Tick::Finished(CountdownDisplay::expired())
        } else {
            Tick::Running(CountdownDisplay::from_remaining(remaining))
        }
    }
}
