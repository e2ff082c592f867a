//! Parking Monitor - ESP32 firmware for a single-slot occupancy monitor.
//!
//! Architecture:
//! - `monitor`: IR occupancy sampling, red/green indicator and buzzer, entrance ultrasonic probe
//! - `net`: WiFi station link, DHCP and the dashboard/status HTTP server
//! - `control`: the single cooperative loop driving both
//!
//! `config`, `occupancy`, `actuators`, `distance`, `snapshot`, `http` and `monitor`
//! depend only on `embedded-hal` and build on the host for tests.

#![no_std]
#![no_main]

use esp_bootloader_esp_idf::esp_app_desc;
esp_app_desc!();

mod actuators;
mod config;
mod control;
mod distance;
mod http;
mod monitor;
mod net;
mod occupancy;
mod server;
mod snapshot;

extern crate alloc;

use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    main,
    time::Duration,
    timer::timg::{MwdtStage, TimerGroup},
};
use esp_println::logger::init_logger;
use esp_radio::wifi::Config as WifiConfig;

use crate::actuators::Actuators;
use crate::control::HalClock;
use crate::distance::DistanceProbe;
use crate::monitor::Monitor;
use crate::net::Network;
use crate::occupancy::OccupancySampler;

const WATCHDOG_TIMEOUT_SECS: u64 = 30;

#[main]
fn main() -> ! {
    init_logger(log::LevelFilter::Info);
    log::info!("Parking monitor starting...");

    // WiFi driver allocates from this heap
    esp_alloc::heap_allocator!(size: 72 * 1024);

    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Watchdog on TIMG1 (TIMG0 drives the esp-rtos scheduler). Armed before
    // radio bring-up so a boot-time panic still ends in a reset.
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let mut wdt = timg1.wdt;
    wdt.set_timeout(MwdtStage::Stage0, Duration::from_secs(WATCHDOG_TIMEOUT_SECS));
    wdt.enable();

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let radio = esp_radio::init().unwrap();
    let (wifi_controller, interfaces) =
        esp_radio::wifi::new(&radio, peripherals.WIFI, WifiConfig::default()).unwrap();

    let settings = config::Config::get();
    log::info!(
        "config: ssid={}, port={}, entrance<{}cm, debounce={}",
        settings.ssid,
        settings.http_port,
        settings.entrance_cm,
        settings.debounce_samples
    );

    // IR occupancy sensor (GPIO34, input-only, module drives the line)
    let ir_sensor = Input::new(peripherals.GPIO34, InputConfig::default().with_pull(Pull::None));

    // Red LED (GPIO25), green LED (GPIO27), buzzer (GPIO12)
    let red = Output::new(peripherals.GPIO25, Level::Low, OutputConfig::default());
    let green = Output::new(peripherals.GPIO27, Level::Low, OutputConfig::default());
    let buzzer = Output::new(peripherals.GPIO12, Level::Low, OutputConfig::default());

    // Ultrasonic trigger (GPIO5) and echo (GPIO18)
    let trigger = Output::new(peripherals.GPIO5, Level::Low, OutputConfig::default());
    let echo = Input::new(peripherals.GPIO18, InputConfig::default().with_pull(Pull::None));

    let monitor = Monitor::new(
        OccupancySampler::new(ir_sensor, settings.debounce_samples),
        Actuators::new(red, green, buzzer),
        DistanceProbe::new(trigger, echo, Delay::new(), HalClock),
        settings.entrance_cm,
    );

    let mut network = Network::new(wifi_controller, interfaces.sta, settings);
    network.wait_until_ready(|| wdt.feed());

    control::run(monitor, network, wdt);
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    log::error!("PANIC: {}", info);

    // Spin without feeding the watchdog. The timeout triggers a full reset.
    loop {
        core::hint::spin_loop();
    }
}
