//! Red/green indicator and buzzer outputs.

use core::convert::Infallible;
use embedded_hal::digital::{OutputPin, PinState};

use crate::occupancy::OccupancyState;

/// Indicator LEDs and buzzer, driven entirely by the current occupancy.
///
/// Exactly one of the two LEDs is lit at any time. The buzzer sounds while the
/// slot is occupied.
pub struct Actuators<R, G, B> {
    occupied_led: R,
    free_led: G,
    buzzer: B,
}

impl<R, G, B> Actuators<R, G, B>
where
    R: OutputPin<Error = Infallible>,
    G: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    pub fn new(occupied_led: R, free_led: G, buzzer: B) -> Self {
        Self {
            occupied_led,
            free_led,
            buzzer,
        }
    }

    pub fn apply(&mut self, state: OccupancyState) {
        let occupied = PinState::from(state.occupied);
        let Ok(()) = self.occupied_led.set_state(occupied);
        let Ok(()) = self.free_led.set_state(!occupied);
        let Ok(()) = self.buzzer.set_state(occupied);
    }
}
