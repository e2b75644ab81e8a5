//! Autoplay: timed advance through the selected folder

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const INTERVAL_MIN_SECS: u64 = 1;
pub const INTERVAL_MAX_SECS: u64 = 60;

/// Autoplay state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AutoplayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Persisted autoplay settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    pub interval_secs: u64,
    /// Start over from the first image after the last one
    pub loop_mode: bool,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            loop_mode: true,
        }
    }
}

impl AutoplayConfig {
    pub fn normalize(&mut self) {
        self.interval_secs = self.interval_secs.clamp(INTERVAL_MIN_SECS, INTERVAL_MAX_SECS);
    }
}

/// Autoplay controller
#[derive(Debug, Clone)]
pub struct Autoplay {
    pub state: AutoplayState,
    interval: Duration,
    loop_mode: bool,
    last_advance: Option<Instant>,
}

impl Default for Autoplay {
    fn default() -> Self {
        Self::new(&AutoplayConfig::default())
    }
}

impl Autoplay {
    pub fn new(config: &AutoplayConfig) -> Self {
        let mut autoplay = Self {
            state: AutoplayState::Stopped,
            interval: Duration::ZERO,
            loop_mode: config.loop_mode,
            last_advance: None,
        };
        autoplay.set_interval_secs(config.interval_secs);
        autoplay
    }

    pub fn start(&mut self, now: Instant) {
        self.state = AutoplayState::Playing;
        self.last_advance = Some(now);
    }

    pub fn stop(&mut self) {
        self.state = AutoplayState::Stopped;
        self.last_advance = None;
    }

    /// Stopped -> Playing -> Paused -> Playing
    pub fn toggle(&mut self, now: Instant) {
        match self.state {
            AutoplayState::Stopped | AutoplayState::Paused => self.start(now),
            AutoplayState::Playing => self.state = AutoplayState::Paused,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == AutoplayState::Playing
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval_secs(&mut self, secs: u64) {
        self.interval = Duration::from_secs(secs.clamp(INTERVAL_MIN_SECS, INTERVAL_MAX_SECS));
    }

    pub fn loop_mode(&self) -> bool {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, loop_mode: bool) {
        self.loop_mode = loop_mode;
    }

    /// Has the interval elapsed since the last advance?
    pub fn should_advance(&self, now: Instant) -> bool {
        if !self.is_playing() {
            return false;
        }
        match self.last_advance {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    pub fn mark_advanced(&mut self, now: Instant) {
        self.last_advance = Some(now);
    }

    /// Snapshot for saving
    pub fn config(&self) -> AutoplayConfig {
        AutoplayConfig {
            interval_secs: self.interval.as_secs(),
            loop_mode: self.loop_mode,
        }
    }
}
