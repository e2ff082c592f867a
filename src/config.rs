//! Firmware configuration, embedded at compile time.
//!
//! There is no runtime reconfiguration: every value here comes from an
//! environment variable read by `option_env!` when the firmware is built
//! (see build.rs). Unset, empty, zero or non-numeric values fall back to the
//! defaults below.

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_ENTRANCE_CM: u32 = 15;
pub const DEFAULT_DEBOUNCE_SAMPLES: u8 = 1;

/// Build-time configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub ssid: &'static str,
    pub password: &'static str,
    pub http_port: u16,
    /// Distance below which an echo counts as a car at the entrance.
    pub entrance_cm: u32,
    /// Consecutive equal sensor readings required to accept a change.
    pub debounce_samples: u8,
}

impl Config {
    /// Get the compile-time configuration.
    pub const fn get() -> Self {
        Self {
            ssid: match option_env!("PARKING_SSID") {
                Some(s) => s,
                None => "unconfigured",
            },
            password: match option_env!("PARKING_PASSWORD") {
                Some(s) => s,
                None => "",
            },
            http_port: match option_env!("PARKING_HTTP_PORT") {
                Some(s) => parse_port(s),
                None => DEFAULT_HTTP_PORT,
            },
            entrance_cm: match option_env!("PARKING_ENTRANCE_CM") {
                Some(s) => parse_number(s, DEFAULT_ENTRANCE_CM),
                None => DEFAULT_ENTRANCE_CM,
            },
            debounce_samples: match option_env!("PARKING_DEBOUNCE_SAMPLES") {
                Some(s) => parse_debounce(s),
                None => DEFAULT_DEBOUNCE_SAMPLES,
            },
        }
    }
}

/// Parse a decimal number (const fn compatible).
///
/// Returns `default` for empty input, zero, any non-digit byte, or overflow.
pub const fn parse_number(s: &str, default: u32) -> u32 {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return default;
    }
    let mut result: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if digit < b'0' || digit > b'9' {
            return default;
        }
        result = match result.checked_mul(10) {
            Some(r) => match r.checked_add((digit - b'0') as u32) {
                Some(r) => r,
                None => return default,
            },
            None => return default,
        };
        i += 1;
    }
    if result == 0 { default } else { result }
}

pub const fn parse_port(s: &str) -> u16 {
    let n = parse_number(s, DEFAULT_HTTP_PORT as u32);
    if n > u16::MAX as u32 { DEFAULT_HTTP_PORT } else { n as u16 }
}

pub const fn parse_debounce(s: &str) -> u8 {
    let n = parse_number(s, DEFAULT_DEBOUNCE_SAMPLES as u32);
    if n > u8::MAX as u32 { DEFAULT_DEBOUNCE_SAMPLES } else { n as u8 }
}
