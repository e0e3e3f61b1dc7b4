//! Timed, pausable walk through a list of destinations.
//!
//! The sequencer owns no timer. The host calls [`Presentation::tick`] with its
//! own clock and applies whatever [`Step`] comes back, which keeps the
//! sequence deterministic and replayable in tests.

use std::str::FromStr;

use foundation::time::Millis;
use tracing::{debug, info};

/// Re-check interval while paused.
pub const PAUSE_POLL_MS: u64 = 200;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    pub fn interval_ms(self) -> u64 {
        match self {
            Speed::Slow => 3000,
            Speed::Medium => 1500,
            Speed::Fast => 800,
        }
    }
}

impl FromStr for Speed {
    type Err = std::convert::Infallible;

    /// Unknown settings fall back to [`Speed::Medium`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Speed::Slow,
            "fast" => Speed::Fast,
            _ => Speed::Medium,
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PresentationState {
    Running,
    Paused,
    Stopped,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Add this destination to the network now.
    Add(String),
    /// Nothing due yet (or paused).
    Idle,
    /// Every destination has been added.
    Finished,
    /// Cancelled via [`Presentation::stop`].
    Stopped,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Progress {
    pub added: usize,
    pub total: usize,
    pub coverage_percent: u32,
}

#[derive(Debug, Clone)]
pub struct Presentation {
    countries: Vec<String>,
    index: usize,
    interval_ms: u64,
    state: PresentationState,
    next_due: Millis,
}

impl Presentation {
    /// Starts a presentation over `countries`, sorted alphabetically.
    ///
    /// Returns `None` when there is nothing to present. The first step is due
    /// immediately at `now`.
    pub fn start(
        countries: impl IntoIterator<Item = String>,
        speed: Speed,
        now: Millis,
    ) -> Option<Self> {
        let mut countries: Vec<String> = countries.into_iter().collect();
        countries.sort();
        countries.dedup();
        if countries.is_empty() {
            return None;
        }
        info!(
            count = countries.len(),
            interval_ms = speed.interval_ms(),
            "presentation started"
        );
        Some(Self {
            countries,
            index: 0,
            interval_ms: speed.interval_ms(),
            state: PresentationState::Running,
            next_due: now,
        })
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// When the next tick will do something, if the presentation is live.
    pub fn next_due(&self) -> Option<Millis> {
        match self.state {
            PresentationState::Running | PresentationState::Paused => Some(self.next_due),
            PresentationState::Stopped | PresentationState::Finished => None,
        }
    }

    /// Most recently added destination.
    pub fn current(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.countries.get(i))
            .map(String::as_str)
    }

    pub fn tick(&mut self, now: Millis) -> Step {
        match self.state {
            PresentationState::Stopped => return Step::Stopped,
            PresentationState::Finished => return Step::Finished,
            PresentationState::Running | PresentationState::Paused => {}
        }
        if now < self.next_due {
            return Step::Idle;
        }
        if self.state == PresentationState::Paused {
            self.next_due = now.after(PAUSE_POLL_MS);
            return Step::Idle;
        }
        let Some(name) = self.countries.get(self.index).cloned() else {
            self.state = PresentationState::Finished;
            info!("presentation finished");
            return Step::Finished;
        };
        self.index += 1;
        self.next_due = now.after(self.interval_ms);
        debug!(step = self.index, country = %name, "presentation step");
        Step::Add(name)
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            PresentationState::Running => PresentationState::Paused,
            PresentationState::Paused => PresentationState::Running,
            other => other,
        };
    }

    pub fn stop(&mut self) {
        if self.state != PresentationState::Finished {
            self.state = PresentationState::Stopped;
            info!(added = self.index, "presentation stopped");
        }
    }

    pub fn progress(&self) -> Progress {
        let total = self.countries.len();
        let added = self.index.min(total);
        let coverage_percent = if total > 0 {
            ((added as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Progress {
            added,
            total,
            coverage_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_list_does_not_start() {
        assert!(Presentation::start(Vec::new(), Speed::Fast, Millis(0)).is_none());
    }

    #[test]
    fn steps_alphabetically_at_fixed_interval() {
        let mut p =
            Presentation::start(names(&["Spain", "Austria", "Latvia"]), Speed::Fast, Millis(0))
                .unwrap();
        assert_eq!(p.tick(Millis(0)), Step::Add("Austria".into()));
        assert_eq!(p.tick(Millis(799)), Step::Idle);
        assert_eq!(p.tick(Millis(800)), Step::Add("Latvia".into()));
        assert_eq!(p.current(), Some("Latvia"));
        assert_eq!(p.tick(Millis(1600)), Step::Add("Spain".into()));
        assert_eq!(p.tick(Millis(2000)), Step::Idle);
        assert_eq!(p.tick(Millis(2400)), Step::Finished);
        assert_eq!(p.state(), PresentationState::Finished);
        assert_eq!(p.next_due(), None);
    }

    #[test]
    fn pause_holds_position() {
        let mut p = Presentation::start(names(&["A", "B"]), Speed::Medium, Millis(0)).unwrap();
        assert_eq!(p.tick(Millis(0)), Step::Add("A".into()));
        p.toggle_pause();
        assert_eq!(p.tick(Millis(1500)), Step::Idle);
        assert_eq!(p.next_due(), Some(Millis(1700)));
        assert_eq!(p.tick(Millis(1600)), Step::Idle);
        p.toggle_pause();
        assert_eq!(p.tick(Millis(1700)), Step::Add("B".into()));
    }

    #[test]
    fn stop_cancels_remaining_steps() {
        let mut p = Presentation::start(names(&["A", "B", "C"]), Speed::Slow, Millis(0)).unwrap();
        assert_eq!(p.tick(Millis(0)), Step::Add("A".into()));
        p.stop();
        assert_eq!(p.tick(Millis(10_000)), Step::Stopped);
        assert_eq!(
            p.progress(),
            Progress {
                added: 1,
                total: 3,
                coverage_percent: 33
            }
        );
    }

    #[test]
    fn speed_parsing_defaults_to_medium() {
        assert_eq!("slow".parse::<Speed>(), Ok(Speed::Slow));
        assert_eq!("FAST".parse::<Speed>(), Ok(Speed::Fast));
        assert_eq!("warp".parse::<Speed>(), Ok(Speed::Medium));
        assert_eq!(Speed::default().interval_ms(), 1500);
    }

    #[test]
    fn duplicates_are_presented_once() {
        let p = Presentation::start(names(&["B", "A", "B"]), Speed::Fast, Millis(0)).unwrap();
        assert_eq!(p.countries(), &["A".to_string(), "B".to_string()]);
    }
}
