//! HTTP server over a pool of smoltcp TCP sockets.
//!
//! Each socket is advanced by at most one step per `poll`, so serving never
//! blocks the control loop. A connection is answered once its request line
//! is complete, then closed. Bytes arriving after the answer are drained and
//! ignored. Every connection gets `IDLE_TIMEOUT_MS` from accept to full
//! close; after that it is aborted so a silent or vanished client can't pin
//! a pool slot.
//!
//! Only smoltcp is used here, so the server builds and runs on the host
//! against a loopback device.

use heapless::Vec as HVec;
use smoltcp::iface::{SocketHandle, SocketSet};
use smoltcp::socket::tcp::{Socket as TcpSocket, SocketBuffer, State as TcpState};

use crate::http::{
    request_line_complete, respond, Request, Response, DASHBOARD_HTML, HEAD_CAPACITY,
};
use crate::occupancy::OccupancyState;

/// Listening sockets, i.e. dashboards that can be served in the same tick.
pub const HTTP_SOCKETS: usize = 4;
pub const HTTP_RX_SIZE: usize = 512;
pub const HTTP_TX_SIZE: usize = 4096;

/// Lifetime budget of one connection, from accept until fully closed.
pub const IDLE_TIMEOUT_MS: u64 = 10_000;

// Every response must fit the TX buffer in one go
const _: () = assert!(DASHBOARD_HTML.len() + HEAD_CAPACITY <= HTTP_TX_SIZE);

/// Per-socket connection state.
struct Connection {
    handle: SocketHandle,
    opened_ms: Option<u64>,
    request: HVec<u8, HTTP_RX_SIZE>,
    responded: bool,
}

impl Connection {
    fn reset(&mut self) {
        self.opened_ms = None;
        self.request.clear();
        self.responded = false;
    }
}

pub struct HttpServer {
    connections: HVec<Connection, HTTP_SOCKETS>,
    port: u16,
}

impl HttpServer {
    /// Create one listening socket per `(rx, tx)` buffer pair, up to
    /// `HTTP_SOCKETS`.
    pub fn new<'a>(
        sockets: &mut SocketSet<'a>,
        port: u16,
        buffers: impl IntoIterator<Item = (&'a mut [u8], &'a mut [u8])>,
    ) -> Self {
        let mut connections = HVec::new();

        for (rx, tx) in buffers.into_iter().take(HTTP_SOCKETS) {
            let mut socket = TcpSocket::new(SocketBuffer::new(rx), SocketBuffer::new(tx));
            if let Err(e) = socket.listen(port) {
                log::error!("http: listen on {} failed: {:?}", port, e);
            }
            let _ = connections.push(Connection {
                handle: sockets.add(socket),
                opened_ms: None,
                request: HVec::new(),
                responded: false,
            });
        }

        Self { connections, port }
    }

    /// Advance every socket by at most one step.
    pub fn poll(&mut self, sockets: &mut SocketSet<'_>, now_ms: u64, occupancy: OccupancyState) {
        let port = self.port;
        for conn in self.connections.iter_mut() {
            let socket = sockets.get_mut::<TcpSocket>(conn.handle);
            serve(conn, socket, port, now_ms, occupancy);
        }
    }
}

fn serve(
    conn: &mut Connection,
    socket: &mut TcpSocket<'_>,
    port: u16,
    now_ms: u64,
    occupancy: OccupancyState,
) {
    let state = socket.state();
    match state {
        TcpState::Closed => {
            // Ready for the next client
            conn.reset();
            socket.listen(port).ok();
            return;
        }
        TcpState::Listen => {
            conn.reset();
            return;
        }
        TcpState::TimeWait => {
            // Everything was acknowledged; skip TIME_WAIT to reuse the socket
            socket.abort();
            conn.reset();
            return;
        }
        _ => {}
    }

    let opened = *conn.opened_ms.get_or_insert(now_ms);
    if now_ms.saturating_sub(opened) >= IDLE_TIMEOUT_MS {
        log::debug!("http: dropping connection idle in {:?}", state);
        socket.abort();
        conn.reset();
        return;
    }

    match state {
        TcpState::Established | TcpState::CloseWait | TcpState::FinWait1 | TcpState::FinWait2 => {}
        _ => return,
    }

    if conn.responded {
        // Leftover headers or a pipelined request; never answered
        while socket.can_recv() {
            if socket.recv(|data| (data.len(), ())).is_err() {
                break;
            }
        }
        return;
    }

    let mut buf = [0u8; HTTP_RX_SIZE];
    let space = HTTP_RX_SIZE - conn.request.len();
    if let Ok(n) = socket.recv_slice(&mut buf[..space]) {
        let _ = conn.request.extend_from_slice(&buf[..n]);
    }

    if !request_line_complete(&conn.request) {
        if conn.request.is_full() {
            log::debug!("http: request line longer than {} bytes", HTTP_RX_SIZE);
            socket.abort();
            conn.reset();
        } else if state == TcpState::CloseWait {
            // Client finished sending without ever completing the line
            socket.close();
        }
        return;
    }

    let Some(request) = Request::parse(&conn.request) else {
        log::debug!("http: malformed request ({} bytes)", conn.request.len());
        socket.abort();
        conn.reset();
        return;
    };

    log::debug!("http: {} {}", request.method, request.path);
    let response = respond(&request, occupancy);
    send(socket, &response);
    socket.close();
    conn.responded = true;
}

fn send(socket: &mut TcpSocket<'_>, response: &Response) {
    let head = response.head();
    for part in [head.as_str(), response.body()] {
        match socket.send_slice(part.as_bytes()) {
            Ok(n) if n == part.len() => {}
            Ok(n) => {
                log::warn!("http: response truncated ({} of {} bytes)", n, part.len());
                return;
            }
            Err(e) => {
                log::warn!("http: send failed: {:?}", e);
                return;
            }
        }
    }
}
