//! The cooperative control loop.
//!
//! Single core, single thread. Each iteration runs, in order:
//! 1. occupancy sample and actuator update (`Monitor::tick`)
//! 2. ultrasonic probe, if due (inside the tick, bounded by the echo timeout)
//! 3. one non-blocking network step, answering only requests already queued
//! 4. watchdog feed and a short yield so the radio tasks can run
//!
//! Nothing preempts an iteration, so anything slow in here delays HTTP.

use esp_hal::peripherals::TIMG1;
use esp_hal::timer::timg::Wdt;

use crate::distance::MicrosClock;
use crate::monitor::{Indicator, Monitor, OccupancySource, RangeFinder, Tick};
use crate::net::Network;
use crate::snapshot::build_snapshot;

const LOOP_YIELD_US: u32 = 5_000;
const STATUS_LOG_MS: u64 = 30_000;

/// Milliseconds since boot.
pub fn uptime_ms() -> u64 {
    esp_hal::time::Instant::now().duration_since_epoch().as_millis()
}

/// System timer as the echo clock.
pub struct HalClock;

impl MicrosClock for HalClock {
    fn now_us(&self) -> u64 {
        esp_hal::time::Instant::now().duration_since_epoch().as_micros()
    }
}

pub fn run<S, A, R>(
    mut monitor: Monitor<S, A, R>,
    mut network: Network<'_>,
    mut wdt: Wdt<TIMG1<'static>>,
) -> !
where
    S: OccupancySource,
    A: Indicator,
    R: RangeFinder,
{
    let mut last_log: u64 = 0;

    loop {
        let now_ms = uptime_ms();

        let tick = monitor.tick(now_ms);
        log_tick(&tick);

        network.poll(now_ms, monitor.state().occupancy);

        if now_ms - last_log >= STATUS_LOG_MS {
            last_log = now_ms;
            let snapshot = build_snapshot(monitor.state().occupancy);
            log::info!(
                "status: free={}/{}{}, wifi={}, heap used={}KB free={}KB",
                snapshot.free,
                snapshot.total,
                if snapshot.is_full() { " (full)" } else { "" },
                if network.link_up() { "up" } else { "down" },
                esp_alloc::HEAP.used() / 1024,
                esp_alloc::HEAP.free() / 1024,
            );
        }

        wdt.feed();

        // Yield to the scheduler so the WiFi driver gets to run
        esp_radio_rtos_driver::usleep(LOOP_YIELD_US);
    }
}

fn log_tick(tick: &Tick) {
    if tick.changed {
        log::info!(
            "slot1: {}",
            if tick.occupancy.occupied { "occupied" } else { "free" }
        );
    }
    if tick.entrance {
        if let Some(cm) = tick.distance.and_then(|d| d.cm()) {
            log::info!("entrance: car detected at {} cm", cm);
        }
    }
}
