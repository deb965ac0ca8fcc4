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
use std::net::UdpSocket;
use std::sync::{PoisonError, RwLock};

use crate::transport::core::{closed_error, SocketStats, Transport, TransportStats};

/// Implementation of a `Transport` that writes datagrams to a UDP socket.
///
/// It accepts a UDP socket instance over which to write datagrams. The
/// destination is given per datagram as a host name or IP address and a
/// port, names are resolved by the operating system on every send.
///
/// Each datagram is written when `.send_to()` is called, in the thread of
/// the caller. Wrap this transport in a `QueuingTransport` to write from a
/// background thread instead.
#[derive(Debug)]
pub struct UdpTransport {
    socket: RwLock<Option<UdpSocket>>,
    stats: SocketStats,
}

impl UdpTransport {
    /// Construct a new `UdpTransport` from an already bound socket.
    ///
    /// The socket should already be bound to a local address with any
    /// desired configuration applied (blocking vs non-blocking, timeouts,
    /// etc.).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::net::UdpSocket;
    /// use tempo::UdpTransport;
    ///
    /// let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
    /// socket.set_nonblocking(true).unwrap();
    /// let transport = UdpTransport::from(socket);
    /// ```
    pub fn from(socket: UdpSocket) -> UdpTransport {
        UdpTransport {
            socket: RwLock::new(Some(socket)),
            stats: SocketStats::default(),
        }
    }

    /// Bind a new non-blocking socket to an ephemeral local port and wrap
    /// it in a `UdpTransport`.
    ///
    /// # Failures
    ///
    /// This method may fail if the socket cannot be bound or put into
    /// non-blocking mode.
    pub fn bind() -> io::Result<UdpTransport> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;
        Ok(Self::from(socket))
    }
}

impl Transport for UdpTransport {
    fn send_to(&self, payload: &[u8], host: &str, port: u16) -> io::Result<usize> {
        let guard = self.socket.read().unwrap_or_else(PoisonError::into_inner);
        let res = match guard.as_ref() {
            Some(socket) => socket.send_to(payload, (host, port)),
            None => Err(closed_error()),
        };

        self.stats.update(res, payload.len())
    }

    fn close(&self) {
        let mut guard = self.socket.write().unwrap_or_else(PoisonError::into_inner);
        // Dropping the socket closes the file descriptor
        guard.take();
    }

    fn stats(&self) -> TransportStats {
        (&self.stats).into()
    }
}
