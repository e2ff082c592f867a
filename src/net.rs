//! WiFi link, DHCP and the hookup of the HTTP server to the radio.
//!
//! Everything here is polled from the control loop and never blocks it,
//! except `wait_until_ready`, which holds boot until the device has an
//! address.

use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};
use smoltcp::iface::{Config as IfaceConfig, Interface, SocketHandle, SocketSet, SocketStorage};
use smoltcp::socket::dhcpv4::{Event as DhcpEvent, Socket as DhcpSocket};
use smoltcp::time::Instant as SmoltcpInstant;
use smoltcp::wire::{EthernetAddress, HardwareAddress, IpCidr};
use static_cell::ConstStaticCell;

use crate::config::Config;
use crate::control::uptime_ms;
use crate::occupancy::OccupancyState;
use crate::server::{HttpServer, HTTP_RX_SIZE, HTTP_SOCKETS, HTTP_TX_SIZE};

// WiFi connection constants
const WIFI_CONNECT_TIMEOUT_MS: u64 = 10_000;
const WIFI_MAX_RETRIES_BEFORE_RESET: u8 = 3;
const WIFI_RESET_COOLDOWN_MS: u64 = 5_000;

const BOOT_POLL_US: u32 = 10_000;
const BOOT_PROGRESS_MS: u64 = 5_000;

static SOCKET_STORAGE: ConstStaticCell<[SocketStorage<'static>; HTTP_SOCKETS + 1]> =
    ConstStaticCell::new([SocketStorage::EMPTY; HTTP_SOCKETS + 1]);
static HTTP_RX: ConstStaticCell<[[u8; HTTP_RX_SIZE]; HTTP_SOCKETS]> =
    ConstStaticCell::new([[0; HTTP_RX_SIZE]; HTTP_SOCKETS]);
static HTTP_TX: ConstStaticCell<[[u8; HTTP_TX_SIZE]; HTTP_SOCKETS]> =
    ConstStaticCell::new([[0; HTTP_TX_SIZE]; HTTP_SOCKETS]);

/// Station-mode network: radio, IP interface and HTTP server.
pub struct Network<'d> {
    controller: WifiController<'d>,
    device: WifiDevice<'d>,
    iface: Interface,
    sockets: SocketSet<'static>,
    dhcp: SocketHandle,
    http: HttpServer,
    wifi: WifiState,
    ip_configured: bool,
    config: Config,
}

impl<'d> Network<'d> {
    pub fn new(controller: WifiController<'d>, mut device: WifiDevice<'d>, config: Config) -> Self {
        let mac = esp_radio::wifi::sta_mac();
        let hw_addr = HardwareAddress::Ethernet(EthernetAddress(mac));
        let now = SmoltcpInstant::from_millis(uptime_ms() as i64);
        let iface = Interface::new(IfaceConfig::new(hw_addr), &mut device, now);

        let storage: &'static mut [SocketStorage<'static>] = SOCKET_STORAGE.take();
        let mut sockets = SocketSet::new(storage);
        let dhcp = sockets.add(DhcpSocket::new());
        let buffers = HTTP_RX
            .take()
            .iter_mut()
            .zip(HTTP_TX.take().iter_mut())
            .map(|(rx, tx)| (&mut rx[..], &mut tx[..]));
        let http = HttpServer::new(&mut sockets, config.http_port, buffers);

        Self {
            controller,
            device,
            iface,
            sockets,
            dhcp,
            http,
            wifi: WifiState::new(),
            ip_configured: false,
            config,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.wifi.connected && self.ip_configured
    }

    pub fn link_up(&self) -> bool {
        self.wifi.connected
    }

    /// Block until WiFi is associated and DHCP has assigned an address.
    /// There is nothing useful to serve before that, so this retries forever.
    pub fn wait_until_ready(&mut self, mut feed_watchdog: impl FnMut()) {
        log::info!("wifi: waiting for network before serving");
        let mut last_progress = uptime_ms();

        while !self.is_ready() {
            let now_ms = uptime_ms();
            self.maintain(now_ms);

            if now_ms - last_progress >= BOOT_PROGRESS_MS {
                last_progress = now_ms;
                log::info!(
                    "wifi: still waiting (link {})",
                    if self.wifi.connected { "up, no address" } else { "down" }
                );
            }

            feed_watchdog();
            esp_radio_rtos_driver::usleep(BOOT_POLL_US);
        }

        log::info!("http: serving on port {}", self.config.http_port);
    }

    /// One non-blocking network step: keep the link up, then answer whatever
    /// requests are already waiting.
    pub fn poll(&mut self, now_ms: u64, occupancy: OccupancyState) {
        self.maintain(now_ms);

        if self.is_ready() {
            self.http.poll(&mut self.sockets, now_ms, occupancy);
            // Push responses out now instead of on the next tick
            let smoltcp_now = SmoltcpInstant::from_millis(now_ms as i64);
            self.iface.poll(smoltcp_now, &mut self.device, &mut self.sockets);
        }
    }

    fn maintain(&mut self, now_ms: u64) {
        self.wifi.maintain(&mut self.controller, &self.config, now_ms, &mut self.ip_configured);

        if !self.wifi.connected {
            return;
        }

        let smoltcp_now = SmoltcpInstant::from_millis(now_ms as i64);
        self.iface.poll(smoltcp_now, &mut self.device, &mut self.sockets);

        let dhcp_socket = self.sockets.get_mut::<DhcpSocket>(self.dhcp);
        if let Some(event) = dhcp_socket.poll() {
            match event {
                DhcpEvent::Configured(dhcp_config) => {
                    let addr = dhcp_config.address;
                    self.iface.update_ip_addrs(|addrs| {
                        addrs.clear();
                        addrs.push(IpCidr::Ipv4(addr)).ok();
                    });
                    if let Some(router) = dhcp_config.router {
                        self.iface.routes_mut().add_default_ipv4_route(router).ok();
                    }
                    log::info!("dhcp: IP={}", addr);
                    self.ip_configured = true;
                }
                DhcpEvent::Deconfigured => {
                    log::warn!("dhcp: deconfigured");
                    self.iface.update_ip_addrs(|addrs| addrs.clear());
                    self.ip_configured = false;
                }
            }
        }
    }
}

/// WiFi connection state machine.
///
/// `maintain` runs once per control-loop iteration and never waits for the
/// link; the only pause is 10 ms while the radio is reconfigured for a new
/// attempt. Sensing and actuation keep going while the link is down. A
/// connect attempt is given `WIFI_CONNECT_TIMEOUT_MS` across
/// many iterations; after `WIFI_MAX_RETRIES_BEFORE_RESET` failures, or on an
/// unexpected disconnect, the radio is stopped and left alone for
/// `WIFI_RESET_COOLDOWN_MS` rather than sleeping inside the loop. Losing the
/// link also drops the DHCP lease, which stops HTTP serving until a new
/// address arrives.
struct WifiState {
    connected: bool,
    connecting: bool,
    connect_started: u64,
    retry_count: u8,
    cooldown_until: u64,
}

impl WifiState {
    fn new() -> Self {
        Self {
            connected: false,
            connecting: false,
            connect_started: 0,
            retry_count: 0,
            cooldown_until: 0,
        }
    }

    fn maintain(
        &mut self,
        controller: &mut WifiController<'_>,
        config: &Config,
        now_ms: u64,
        ip_configured: &mut bool,
    ) {
        use alloc::string::ToString;

        if self.connected {
            if !controller.is_connected().unwrap_or(false) {
                log::warn!("wifi: disconnected, will power-cycle radio");
                self.connected = false;
                self.connecting = false;
                *ip_configured = false;
                self.power_cycle(controller, now_ms);
            }
            return;
        }

        if now_ms < self.cooldown_until {
            return;
        }

        if !self.connecting {
            log::info!("wifi: connecting to {}", config.ssid);

            // Stop before (re)configuring to avoid driver errors
            let _ = controller.stop();
            esp_radio_rtos_driver::usleep(10_000);

            let client_config = ClientConfig::default()
                .with_ssid(config.ssid.to_string())
                .with_password(config.password.to_string());
            if let Err(e) = controller.set_config(&ModeConfig::Client(client_config)) {
                log::error!("wifi: set_config failed: {:?}", e);
            }
            if let Err(e) = controller.start() {
                log::error!("wifi: start failed: {:?}", e);
            }
            if let Err(e) = controller.connect() {
                log::error!("wifi: connect failed: {:?}", e);
            }
            self.connecting = true;
            self.connect_started = now_ms;
            return;
        }

        if controller.is_connected().unwrap_or(false) {
            log::info!("wifi: connected");
            self.connected = true;
            self.connecting = false;
            self.retry_count = 0;
        } else if now_ms - self.connect_started > WIFI_CONNECT_TIMEOUT_MS {
            self.retry_count = self.retry_count.saturating_add(1);
            log::warn!(
                "wifi: connection timeout (attempt {}/{})",
                self.retry_count,
                WIFI_MAX_RETRIES_BEFORE_RESET
            );
            self.connecting = false;

            if self.retry_count >= WIFI_MAX_RETRIES_BEFORE_RESET {
                log::warn!("wifi: power-cycling radio after {} failures", self.retry_count);
                self.retry_count = 0;
                self.power_cycle(controller, now_ms);
            }
        }
    }

    fn power_cycle(&mut self, controller: &mut WifiController<'_>, now_ms: u64) {
        if let Err(e) = controller.disconnect() {
            log::warn!("wifi: disconnect failed: {:?}", e);
        }
        if let Err(e) = controller.stop() {
            log::warn!("wifi: stop failed: {:?}", e);
        }
        self.cooldown_until = now_ms + WIFI_RESET_COOLDOWN_MS;
    }
}
