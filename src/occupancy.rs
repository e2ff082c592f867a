//! Occupancy sampling for the monitored slot.
//!
//! The IR sensor output is read once per loop iteration. Without debouncing
//! (the default, `debounce_samples == 1`) the latest raw reading always wins,
//! so flicker at the edge of the sensor's detection range shows up directly on
//! the indicator and buzzer.

use core::convert::Infallible;
use embedded_hal::digital::InputPin;

/// Occupancy of the single monitored slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OccupancyState {
    pub occupied: bool,
}

impl OccupancyState {
    pub const FREE: Self = Self { occupied: false };
    pub const OCCUPIED: Self = Self { occupied: true };

    /// Number of occupied slots (0 or 1).
    pub const fn occupied_count(self) -> u8 {
        self.occupied as u8
    }
}

/// Accepts a level change only after `required` consecutive equal samples.
pub struct Debouncer {
    required: u8,
    stable: Option<bool>,
    candidate: bool,
    streak: u8,
}

impl Debouncer {
    /// `required` of 0 is treated as 1.
    pub const fn new(required: u8) -> Self {
        Self {
            required: if required == 0 { 1 } else { required },
            stable: None,
            candidate: false,
            streak: 0,
        }
    }

    /// Feed one raw reading and return the debounced level.
    ///
    /// The very first reading is adopted immediately.
    pub fn update(&mut self, raw: bool) -> bool {
        let stable = match self.stable {
            Some(stable) => stable,
            None => {
                self.stable = Some(raw);
                return raw;
            }
        };

        if raw == stable {
            self.streak = 0;
            return stable;
        }

        if self.streak > 0 && raw == self.candidate {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.candidate = raw;
            self.streak = 1;
        }

        if self.streak >= self.required {
            self.stable = Some(raw);
            self.streak = 0;
            raw
        } else {
            stable
        }
    }
}

/// Reads the digital occupancy sensor.
pub struct OccupancySampler<P> {
    pin: P,
    debounce: Debouncer,
}

impl<P> OccupancySampler<P>
where
    P: InputPin<Error = Infallible>,
{
    pub fn new(pin: P, debounce_samples: u8) -> Self {
        Self {
            pin,
            debounce: Debouncer::new(debounce_samples),
        }
    }

    /// Sample the sensor once.
    pub fn sample(&mut self) -> OccupancyState {
        // Sensor output is pulled LOW while an object is in front of it
        let Ok(raw) = self.pin.is_low();
        if self.debounce.update(raw) {
            OccupancyState::OCCUPIED
        } else {
            OccupancyState::FREE
        }
    }
}
