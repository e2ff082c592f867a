//! One sensing tick: sample occupancy, drive the actuators, probe the entrance.
//!
//! `Monitor` owns the application state. The HTTP side only ever sees it
//! through `Monitor::state()`, after a tick has completed, so a response is
//! always built from one consistent occupancy value.

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::actuators::Actuators;
use crate::distance::{DistanceProbe, DistanceReading, EntranceDetector, MicrosClock};
use crate::occupancy::{OccupancySampler, OccupancyState};

/// Minimum spacing between ultrasonic pings so echoes don't overlap.
pub const PROBE_INTERVAL_MS: u64 = 60;

pub trait OccupancySource {
    fn sample(&mut self) -> OccupancyState;
}

pub trait Indicator {
    fn show(&mut self, state: OccupancyState);
}

pub trait RangeFinder {
    fn measure(&mut self) -> DistanceReading;
}

impl<P> OccupancySource for OccupancySampler<P>
where
    P: InputPin<Error = Infallible>,
{
    fn sample(&mut self) -> OccupancyState {
        OccupancySampler::sample(self)
    }
}

impl<R, G, B> Indicator for Actuators<R, G, B>
where
    R: OutputPin<Error = Infallible>,
    G: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    fn show(&mut self, state: OccupancyState) {
        self.apply(state);
    }
}

impl<T, E, D, C> RangeFinder for DistanceProbe<T, E, D, C>
where
    T: OutputPin<Error = Infallible>,
    E: InputPin<Error = Infallible>,
    D: DelayNs,
    C: MicrosClock,
{
    fn measure(&mut self) -> DistanceReading {
        DistanceProbe::measure(self)
    }
}

/// Everything the device knows, written once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub occupancy: OccupancyState,
}

/// Outcome of one tick, for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub occupancy: OccupancyState,
    /// Occupancy differs from the previous tick.
    pub changed: bool,
    /// Set when the probe ran this tick.
    pub distance: Option<DistanceReading>,
    /// A car just arrived at the entrance.
    pub entrance: bool,
}

pub struct Monitor<S, A, R> {
    sampler: S,
    actuators: A,
    probe: R,
    entrance: EntranceDetector,
    state: AppState,
    last_probe_ms: Option<u64>,
}

impl<S, A, R> Monitor<S, A, R>
where
    S: OccupancySource,
    A: Indicator,
    R: RangeFinder,
{
    /// Starts out free, with the actuators already showing it.
    pub fn new(sampler: S, mut actuators: A, probe: R, entrance_cm: u32) -> Self {
        let state = AppState {
            occupancy: OccupancyState::FREE,
        };
        actuators.show(state.occupancy);
        Self {
            sampler,
            actuators,
            probe,
            entrance: EntranceDetector::new(entrance_cm),
            state,
            last_probe_ms: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn tick(&mut self, now_ms: u64) -> Tick {
        let occupancy = self.sampler.sample();
        let changed = occupancy != self.state.occupancy;
        self.state.occupancy = occupancy;
        self.actuators.show(occupancy);

        let distance = if self.probe_due(now_ms) {
            self.last_probe_ms = Some(now_ms);
            Some(self.probe.measure())
        } else {
            None
        };
        let entrance = match distance {
            Some(reading) => self.entrance.update(reading),
            None => false,
        };

        Tick {
            occupancy,
            changed,
            distance,
            entrance,
        }
    }

    fn probe_due(&self, now_ms: u64) -> bool {
        match self.last_probe_ms {
            Some(last) => now_ms.saturating_sub(last) >= PROBE_INTERVAL_MS,
            None => true,
        }
    }
}
