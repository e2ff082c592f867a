//! Build script for compile-time configuration injection.
//!
//! Set environment variables before building to configure the firmware:
//!
//!   PARKING_SSID=MyWiFi \
//!   PARKING_PASSWORD=secret123 \
//!   PARKING_HTTP_PORT=80 \
//!   PARKING_ENTRANCE_CM=15 \
//!   PARKING_DEBOUNCE_SAMPLES=1 \
//!   cargo build --release

fn main() {
    println!("cargo::rerun-if-env-changed=PARKING_SSID");
    println!("cargo::rerun-if-env-changed=PARKING_PASSWORD");
    println!("cargo::rerun-if-env-changed=PARKING_HTTP_PORT");
    println!("cargo::rerun-if-env-changed=PARKING_ENTRANCE_CM");
    println!("cargo::rerun-if-env-changed=PARKING_DEBOUNCE_SAMPLES");
}
