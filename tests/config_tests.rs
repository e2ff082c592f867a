//! Unit tests for build-time configuration parsing.

#![allow(dead_code)]

#[path = "../src/config.rs"]
mod config;

use config::{
    parse_debounce, parse_number, parse_port, Config, DEFAULT_DEBOUNCE_SAMPLES, DEFAULT_HTTP_PORT,
};

#[test]
fn test_parse_number_plain_digits() {
    assert_eq!(parse_number("15", 99), 15);
    assert_eq!(parse_number("8080", 99), 8080);
}

#[test]
fn test_parse_number_empty_uses_default() {
    assert_eq!(parse_number("", 42), 42);
}

#[test]
fn test_parse_number_zero_uses_default() {
    assert_eq!(parse_number("0", 42), 42);
    assert_eq!(parse_number("000", 42), 42);
}

#[test]
fn test_parse_number_rejects_non_digits() {
    assert_eq!(parse_number("12a", 42), 42);
    assert_eq!(parse_number(" 12", 42), 42);
    assert_eq!(parse_number("-5", 42), 42);
}

#[test]
fn test_parse_number_overflow_uses_default() {
    assert_eq!(parse_number("99999999999", 42), 42);
}

#[test]
fn test_parse_port_out_of_range() {
    assert_eq!(parse_port("8080"), 8080);
    assert_eq!(parse_port("70000"), DEFAULT_HTTP_PORT);
    assert_eq!(parse_port(""), DEFAULT_HTTP_PORT);
}

#[test]
fn test_parse_debounce_out_of_range() {
    assert_eq!(parse_debounce("3"), 3);
    assert_eq!(parse_debounce("300"), DEFAULT_DEBOUNCE_SAMPLES);
}

#[test]
fn test_config_values_are_usable() {
    // Whatever the build environment sets, parsing never yields zero
    const CONFIG: Config = Config::get();
    assert!(CONFIG.http_port > 0);
    assert!(CONFIG.entrance_cm > 0);
    assert!(CONFIG.debounce_samples > 0);
}
