//! HTTP request parsing, routing and response formatting.
//!
//! Transport lives in `server`; this module only turns request bytes into a
//! response. Routes:
//!
//! - `/`        dashboard page (polls `/status` every 2 s)
//! - `/status`  JSON snapshot of the slot
//! - anything else: 404 `Not found`
//!
//! Request bodies, headers and query strings are ignored.

use core::fmt::Write as FmtWrite;
use heapless::String as HString;

use crate::occupancy::OccupancyState;
use crate::snapshot::{build_snapshot, JSON_CAPACITY};

pub const DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// Capacity for the status line and headers.
pub const HEAD_CAPACITY: usize = 192;

/// Method and path from a request line.
#[derive(Debug, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: &'a str,
    pub path: &'a str,
}

impl<'a> Request<'a> {
    /// Parse the request line. Returns `None` until the line is terminated,
    /// and for anything that isn't `<method> <target> ...` in UTF-8.
    pub fn parse(buf: &'a [u8]) -> Option<Self> {
        let line_end = buf.iter().position(|&b| b == b'\n')?;
        let line = core::str::from_utf8(&buf[..line_end]).ok()?;

        let mut parts = line.split_whitespace();
        let method = parts.next()?;
        let target = parts.next()?;
        let path = target.split_once('?').map_or(target, |(path, _)| path);

        Some(Self { method, path })
    }
}

/// The request line has arrived in full (a `\n` has been seen).
pub fn request_line_complete(buf: &[u8]) -> bool {
    buf.contains(&b'\n')
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Status,
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Route::Dashboard,
            "/status" => Route::Status,
            _ => Route::NotFound,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
}

impl Status {
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NotFound => 404,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NotFound => "Not Found",
        }
    }
}

#[derive(Debug)]
enum Body {
    Static(&'static str),
    Json(HString<JSON_CAPACITY>),
}

/// A complete response: status, content type and body.
#[derive(Debug)]
pub struct Response {
    pub status: Status,
    pub content_type: &'static str,
    body: Body,
}

impl Response {
    fn html(body: &'static str) -> Self {
        Self {
            status: Status::Ok,
            content_type: "text/html",
            body: Body::Static(body),
        }
    }

    fn json(body: HString<JSON_CAPACITY>) -> Self {
        Self {
            status: Status::Ok,
            content_type: "application/json",
            body: Body::Json(body),
        }
    }

    fn text(status: Status, body: &'static str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Body::Static(body),
        }
    }

    pub fn body(&self) -> &str {
        match &self.body {
            Body::Static(s) => s,
            Body::Json(s) => s.as_str(),
        }
    }

    /// Status line and headers, including the blank line before the body.
    pub fn head(&self) -> HString<HEAD_CAPACITY> {
        let mut head: HString<HEAD_CAPACITY> = HString::new();
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Cache-Control: no-store\r\n\
             Connection: close\r\n\r\n",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.body().len()
        );
        head
    }
}

/// Answer a request from the latest completed occupancy sample.
pub fn respond(request: &Request<'_>, state: OccupancyState) -> Response {
    match Route::from_path(request.path) {
        Route::Dashboard => Response::html(DASHBOARD_HTML),
        Route::Status => Response::json(build_snapshot(state).to_json()),
        Route::NotFound => Response::text(Status::NotFound, "Not found"),
    }
}
