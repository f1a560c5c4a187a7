//! Cyclic weapon firing patterns.
//!
//! A pattern is a timeline of shots, each an offset in the shooter's
//! (right, up) frame and a trigger time within the period. Every update
//! advances the cycle clock and reports the offsets whose trigger time was
//! crossed.
//!
//! A tick whose clock reaches the period boundary fires whatever is left of
//! the current cycle, starts the next cycle, and fires that cycle's shots
//! up to and including the new clock value. The reset tick is therefore
//! never silent; a shot scheduled at t = 0 fires exactly once per period.
//! Cycles skipped entirely by a long step are not replayed.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Offset in the shooter frame: x = right, y = up.
    pub offset: DVec2,
    /// Trigger time within the period (seconds).
    pub time: f64,
}

#[derive(Debug, Clone)]
pub struct WeaponPattern {
    period: f64,
    shots: Vec<Shot>,
    cursor: usize,
    clock: f64,
    fired: Vec<DVec2>,
}

impl WeaponPattern {
    pub fn new(period: f64) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(Error::InvalidPattern {
                reason: format!("period must be positive, got {period}"),
            });
        }
        Ok(Self {
            period,
            shots: Vec::new(),
            cursor: 0,
            clock: 0.0,
            fired: Vec::new(),
        })
    }

    /// Append a shot. Trigger times must be non-decreasing and within the period.
    pub fn shot(mut self, offset: [f64; 2], time: f64) -> Result<Self> {
        if !(0.0..=self.period).contains(&time) {
            return Err(Error::InvalidPattern {
                reason: format!("shot time {time} outside [0, {}]", self.period),
            });
        }
        if let Some(last) = self.shots.last() {
            if time < last.time {
                return Err(Error::InvalidPattern {
                    reason: format!("shot time {time} precedes {}", last.time),
                });
            }
        }
        self.shots.push(Shot {
            offset: DVec2::from(offset),
            time,
        });
        Ok(self)
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    /// Position of the cycle clock within the current period.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Restart the cycle from its first shot.
    pub fn reset(&mut self) {
        self.clock = 0.0;
        self.cursor = 0;
        self.fired.clear();
    }

    /// Advance by `dt` and return the offsets fired during this tick.
    /// The returned slice is reused by the next call.
    ///
    /// A step spanning several periods fires at most the rest of the
    /// current cycle plus the next one; skipped cycles are dropped. A
    /// non-finite `dt` fires nothing and leaves the clock untouched.
    pub fn update(&mut self, dt: f64) -> &[DVec2] {
        self.fired.clear();
        if !dt.is_finite() {
            return &self.fired;
        }
        let mut end = self.clock + dt.max(0.0);

        if end >= self.period {
            self.fire_while(|_| true);
            end %= self.period;
            self.cursor = 0;
            self.fire_while(|time| time <= end);
        } else {
            self.fire_while(|time| time < end);
        }
        self.clock = end;
        &self.fired
    }

    fn fire_while(&mut self, due: impl Fn(f64) -> bool) {
        while let Some(shot) = self.shots.get(self.cursor) {
            if !due(shot.time) {
                break;
            }
            self.fired.push(shot.offset);
            self.cursor += 1;
        }
    }
}
