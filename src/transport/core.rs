// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Callback invoked by a transport once a datagram has been written (or
/// failed to be written). It receives the number of bytes sent.
pub type Completion = Box<dyn FnOnce(io::Result<usize>) + Send + 'static>;

/// A single encoded metric line and where it should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: Vec<u8>,
    pub host: String,
    pub port: u16,
}

impl Datagram {
    pub fn new(payload: Vec<u8>, host: String, port: u16) -> Self {
        Datagram { payload, host, port }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub bytes_sent: u64,
    pub packets_sent: u64,
    pub bytes_dropped: u64,
    pub packets_dropped: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SocketStats {
    bytes_sent: Arc<AtomicU64>,
    packets_sent: Arc<AtomicU64>,
    bytes_dropped: Arc<AtomicU64>,
    packets_dropped: Arc<AtomicU64>,
}

impl SocketStats {
    pub fn update(&self, res: io::Result<usize>, len: usize) -> io::Result<usize> {
        match res {
            Ok(written) => {
                self.bytes_sent.fetch_add(written as u64, Ordering::Relaxed);
                self.packets_sent.fetch_add(1, Ordering::Relaxed);
                Ok(written)
            }
            Err(e) => {
                self.bytes_dropped.fetch_add(len as u64, Ordering::Relaxed);
                self.packets_dropped.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}

impl From<&SocketStats> for TransportStats {
    fn from(stats: &SocketStats) -> Self {
        TransportStats {
            bytes_sent: stats.bytes_sent.load(Ordering::Relaxed),
            packets_sent: stats.packets_sent.load(Ordering::Relaxed),
            bytes_dropped: stats.bytes_dropped.load(Ordering::Relaxed),
            packets_dropped: stats.packets_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Error returned by transports that have been closed.
pub(crate) fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "transport closed")
}

/// Trait for the datagram backends that carry Statsd lines to a server.
///
/// Each payload is a single metric line in the canonical format with no
/// trailing newline, for example:
///
/// ``` text
/// my.app.requests:1|c|@0.5|#route:/users
/// ```
///
/// The host may be a name or a literal IP address. Transports are expected
/// to resolve names themselves on each send since the client only caches a
/// resolved address when asked to.
pub trait Transport {
    /// Write the datagram to `host:port` and return the number of bytes
    /// written or an I/O error.
    fn send_to(&self, payload: &[u8], host: &str, port: u16) -> io::Result<usize>;

    /// Hand the datagram off and report the outcome to `done` when it is
    /// known.
    ///
    /// The default implementation writes the datagram in the thread of the
    /// caller and invokes the completion before returning. Transports that
    /// write from another thread override this and return immediately.
    fn dispatch(&self, datagram: Datagram, done: Completion) {
        done(self.send_to(&datagram.payload, &datagram.host, datagram.port));
    }

    /// Release the underlying handle. Sends after this must fail.
    ///
    /// Note that not all transports own a handle and the default
    /// implementation does nothing.
    fn close(&self) {}

    /// Return I/O telemetry like bytes / packets sent or dropped.
    ///
    /// Note that not all transports implement this method and the default
    /// implementation returns zeros.
    fn stats(&self) -> TransportStats {
        TransportStats::default()
    }
}

/// Implementation of a `Transport` that discards all datagrams.
///
/// Useful for disabling metric collection or unit tests.
#[derive(Debug, Clone)]
pub struct NopTransport;

impl Transport for NopTransport {
    fn send_to(&self, _payload: &[u8], _host: &str, _port: u16) -> io::Result<usize> {
        Ok(0)
    }
}
