//! Simulation clock.
//!
//! The clock counts ticks and maps them to simulated seconds. Every tick
//! covers the same fixed `tick_seconds`, so the work phase of a run is
//! independent of wall-clock pacing.

use crate::config::WorldConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. a zero tick length).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Tick counter with a fixed simulated step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimClock {
    /// Current tick number (0 before the first tick).
    tick: u64,

    /// Simulated seconds covered by one tick.
    tick_seconds: f32,
}

impl SimClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] unless `tick_seconds` is finite
    /// and positive.
    pub fn new(tick_seconds: f32) -> Result<Self, ClockError> {
        if !tick_seconds.is_finite() || tick_seconds <= 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!("tick_seconds must be a positive number, got {tick_seconds}"),
            });
        }
        Ok(Self {
            tick: 0,
            tick_seconds,
        })
    }

    /// Create a clock from the world configuration.
    ///
    /// # Errors
    ///
    /// See [`SimClock::new`].
    pub fn from_config(config: &WorldConfig) -> Result<Self, ClockError> {
        Self::new(config.tick_seconds)
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds per tick.
    pub const fn tick_seconds(&self) -> f32 {
        self.tick_seconds
    }

    /// Simulated seconds since tick 0.
    #[allow(clippy::cast_precision_loss)]
    pub fn elapsed_seconds(&self) -> f64 {
        self.tick as f64 * f64::from(self.tick_seconds)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_starts_at_zero() {
        let clock = SimClock::new(0.5).unwrap();
        assert_eq!(clock.tick(), 0);
        assert!(clock.elapsed_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn advance_increments_and_accumulates_time() {
        let mut clock = SimClock::new(0.5).unwrap();
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
        assert!((clock.elapsed_seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_tick_seconds_rejected() {
        assert!(SimClock::new(0.0).is_err());
        assert!(SimClock::new(-1.0).is_err());
        assert!(SimClock::new(f32::NAN).is_err());
        assert!(SimClock::new(f32::INFINITY).is_err());
    }

    #[test]
    fn overflow_is_reported() {
        let mut clock = SimClock {
            tick: u64::MAX,
            tick_seconds: 1.0,
        };
        assert_eq!(clock.advance(), Err(ClockError::TickOverflow));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn from_default_config() {
        let clock = SimClock::from_config(&WorldConfig::default()).unwrap();
        assert!(clock.tick_seconds() > 0.0);
    }
}
