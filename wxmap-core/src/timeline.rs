//! Simulated clock over the active time range.
//!
//! [`Playback`] holds the range, the current instant and the play/pause
//! state. It does not own a timer; the host drives it by calling
//! [`Playback::tick`] every [`Playback::interval`] while it is playing.

use crate::series::{hour_index, TimeRange};
use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// Tick period at 1× speed, in milliseconds.
pub const BASE_TICK_MS: u64 = 1000;

/// Playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    Half,
    #[default]
    Normal,
    Double,
    Quadruple,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 4] = [Self::Half, Self::Normal, Self::Double, Self::Quadruple];

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::Double => 2.0,
            Self::Quadruple => 4.0,
        }
    }

    /// Closest speed to a multiplier such as `2.0`.
    pub fn from_multiplier(x: f64) -> Self {
        Self::ALL
            .into_iter()
            .min_by(|a, b| {
                (a.multiplier() - x)
                    .abs()
                    .total_cmp(&(b.multiplier() - x).abs())
            })
            .unwrap_or_default()
    }

    pub fn label(&self) -> String {
        format!("{}x", self.multiplier())
    }
}

/// What a tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(DateTime<Utc>),
    /// The clock hit the range end and playback stopped.
    Finished(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    range: TimeRange,
    current: DateTime<Utc>,
    playing: bool,
    speed: PlaybackSpeed,
    base_tick_ms: u64,
}

impl Playback {
    /// Paused at the start of `range`.
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            current: range.start,
            playing: false,
            speed: PlaybackSpeed::Normal,
            base_tick_ms: BASE_TICK_MS,
        }
    }

    pub fn with_base_tick_ms(mut self, ms: u64) -> Self {
        self.base_tick_ms = ms.max(1);
        self
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn current(&self) -> DateTime<Utc> {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }

    /// Time between ticks at the current speed.
    pub fn interval(&self) -> std::time::Duration {
        let ms = self.base_tick_ms as f64 / self.speed.multiplier();
        std::time::Duration::from_millis(ms.round() as u64)
    }

    /// Replace the range; the clock jumps to its start and playback stops.
    pub fn set_range(&mut self, range: TimeRange) {
        self.range = range;
        self.current = range.start;
        self.playing = false;
    }

    pub fn total_hours(&self) -> usize {
        self.range.total_hours()
    }

    /// Hour of the clock within the range, clamped to `[0, total - 1]`.
    pub fn current_hour(&self) -> usize {
        let last = self.total_hours().saturating_sub(1);
        hour_index(self.range.start, self.current)
            .unwrap_or(0)
            .min(last)
    }

    /// Percentage of the range elapsed; 0 when the range spans at most an
    /// hour.
    pub fn progress(&self) -> f64 {
        let total = self.total_hours();
        if total <= 1 {
            return 0.0;
        }
        self.current_hour() as f64 / (total - 1) as f64 * 100.0
    }

    /// Start playing. Refused once the clock has reached the range end.
    pub fn play(&mut self) -> bool {
        if self.current >= self.range.end {
            return false;
        }
        self.playing = true;
        true
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flip between playing and paused; returns the new playing state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
        self.playing
    }

    /// Advance one hour. Past the end the clock clamps to the end and
    /// playback stops.
    pub fn tick(&mut self) -> TickOutcome {
        let next = self.current + Duration::hours(1);
        if next > self.range.end {
            self.current = self.range.end;
            if self.playing {
                info!("playback reached {}", self.range.end.to_rfc3339());
            }
            self.playing = false;
            return TickOutcome::Finished(self.current);
        }
        self.current = next;
        TickOutcome::Advanced(next)
    }

    /// Move the clock to the start of hour `hour`, clamped to the range.
    pub fn seek_hour(&mut self, hour: usize) {
        self.current = self.range.clamp(self.range.hour_start(hour));
    }

    /// Move the clock to `t`, clamped to the range.
    pub fn seek(&mut self, t: DateTime<Utc>) {
        self.current = self.range.clamp(t);
    }

    pub fn skip_to_start(&mut self) {
        self.current = self.range.start;
    }

    pub fn skip_to_end(&mut self) {
        self.current = self.range.end;
        self.playing = false;
    }

    pub fn at_start(&self) -> bool {
        self.current <= self.range.start
    }

    pub fn at_end(&self) -> bool {
        self.current >= self.range.end
    }
}
