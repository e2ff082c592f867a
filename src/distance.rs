//! HC-SR04 style ultrasonic ranging at the entrance.
//!
//! The trigger line is pulsed high for 10 µs, then the width of the echo
//! pulse is timed. Both the wait for the echo to start and the pulse itself
//! share one bounded budget, so a missing echo stalls the control loop for at
//! most `ECHO_TIMEOUT_US`.
//!
//! Readings are diagnostic only. They feed the entrance log and never touch
//! occupancy or the actuators.

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

const TRIGGER_SETTLE_US: u32 = 2;
const TRIGGER_PULSE_US: u32 = 10;

/// Upper bound on the echo wait (~5 m of range).
pub const ECHO_TIMEOUT_US: u64 = 30_000;

/// Monotonic microsecond time source used to time the echo pulse.
pub trait MicrosClock {
    fn now_us(&self) -> u64;
}

/// Result of one ranging attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceReading {
    /// Distance in whole centimeters.
    Range(u32),
    /// No echo within the timeout: nothing in range.
    NoEcho,
}

impl DistanceReading {
    /// Convert an echo pulse width to distance: round trip at ~340 m/s,
    /// i.e. `us * 0.034 / 2`, truncated.
    pub const fn from_echo_us(echo_us: u64) -> Self {
        DistanceReading::Range((echo_us * 34 / 2000) as u32)
    }

    pub const fn cm(self) -> Option<u32> {
        match self {
            DistanceReading::Range(cm) => Some(cm),
            DistanceReading::NoEcho => None,
        }
    }
}

/// Ultrasonic probe on a trigger/echo pin pair.
pub struct DistanceProbe<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
}

impl<T, E, D, C> DistanceProbe<T, E, D, C>
where
    T: OutputPin<Error = Infallible>,
    E: InputPin<Error = Infallible>,
    D: DelayNs,
    C: MicrosClock,
{
    pub fn new(trigger: T, echo: E, delay: D, clock: C) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
        }
    }

    /// Fire one ranging pulse and time the echo. Blocks for at most
    /// `ECHO_TIMEOUT_US` after the trigger pulse.
    pub fn measure(&mut self) -> DistanceReading {
        let Ok(()) = self.trigger.set_low();
        self.delay.delay_us(TRIGGER_SETTLE_US);
        let Ok(()) = self.trigger.set_high();
        self.delay.delay_us(TRIGGER_PULSE_US);
        let Ok(()) = self.trigger.set_low();

        let start = self.clock.now_us();

        let Some(rise) = self.wait_for_level(true, start) else {
            return DistanceReading::NoEcho;
        };
        let Some(fall) = self.wait_for_level(false, start) else {
            return DistanceReading::NoEcho;
        };

        DistanceReading::from_echo_us(fall - rise)
    }

    /// Spin until the echo line reaches `high`, returning the time it did.
    fn wait_for_level(&mut self, high: bool, start: u64) -> Option<u64> {
        loop {
            let Ok(level) = self.echo.is_high();
            let now = self.clock.now_us();
            if level == high {
                return Some(now);
            }
            if now.saturating_sub(start) >= ECHO_TIMEOUT_US {
                return None;
            }
        }
    }
}

/// Turns distance readings into edge-triggered entrance events.
///
/// An event fires when a reading inside `(0, threshold_cm)` follows one that
/// was not, so a car waiting under the sensor is reported once.
pub struct EntranceDetector {
    threshold_cm: u32,
    present: bool,
}

impl EntranceDetector {
    pub const fn new(threshold_cm: u32) -> Self {
        Self {
            threshold_cm,
            present: false,
        }
    }

    pub fn in_range(&self, reading: DistanceReading) -> bool {
        matches!(reading, DistanceReading::Range(cm) if cm > 0 && cm < self.threshold_cm)
    }

    /// Returns true when a car has just arrived at the entrance.
    pub fn update(&mut self, reading: DistanceReading) -> bool {
        let in_range = self.in_range(reading);
        let arrived = in_range && !self.present;
        self.present = in_range;
        arrived
    }
}
