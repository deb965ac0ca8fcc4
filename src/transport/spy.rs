// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::transport::core::{closed_error, Datagram, Transport};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::io::{self, ErrorKind};
use std::sync::atomic::{AtomicBool, Ordering};

/// `Transport` implementation that writes every datagram to the `Sender`
/// half of a channel while callers are given ownership of the `Receiver`
/// half.
///
/// This is not a general purpose transport, rather it's meant for verifying
/// datagrams written during the course of integration tests. By default, the
/// channel used is unbounded. The channel size can be limited using the
/// `with_capacity` method.
///
/// Each datagram is sent to the channel when the `.send_to()` method is
/// called, in the thread of the caller.
#[derive(Debug)]
pub struct SpyTransport {
    sender: Sender<Datagram>,
    closed: AtomicBool,
}

impl SpyTransport {
    pub fn new() -> (Receiver<Datagram>, Self) {
        Self::with_queue_capacity(None)
    }

    pub fn with_capacity(queue: usize) -> (Receiver<Datagram>, Self) {
        Self::with_queue_capacity(Some(queue))
    }

    fn with_queue_capacity(queue: Option<usize>) -> (Receiver<Datagram>, Self) {
        let (tx, rx) = match queue {
            Some(sz) => bounded(sz),
            None => unbounded(),
        };

        let transport = SpyTransport {
            sender: tx,
            closed: AtomicBool::new(false),
        };
        (rx, transport)
    }
}

impl Transport for SpyTransport {
    fn send_to(&self, payload: &[u8], host: &str, port: u16) -> io::Result<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(closed_error());
        }

        let datagram = Datagram::new(payload.to_vec(), host.to_string(), port);
        match self.sender.try_send(datagram) {
            Err(TrySendError::Disconnected(_)) => Err(io::Error::new(ErrorKind::Other, "channel disconnected")),
            Err(TrySendError::Full(_)) => Err(io::Error::new(ErrorKind::Other, "channel full")),
            Ok(_) => Ok(payload.len()),
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::SpyTransport;
    use crate::transport::core::Transport;
    use std::io;

    #[test]
    fn test_spy_transport() {
        let (rx, transport) = SpyTransport::new();
        assert_eq!(7, transport.send_to(b"buz:1|c", "statsd.local", 8126).unwrap());

        let sent = rx.recv().unwrap();
        assert_eq!(b"buz:1|c".as_ref(), sent.payload.as_slice());
        assert_eq!("statsd.local", sent.host);
        assert_eq!(8126, sent.port);
    }

    #[test]
    fn test_spy_transport_full() {
        let (_rx, transport) = SpyTransport::with_capacity(1);
        transport.send_to(b"buz:1|c", "localhost", 8125).unwrap();

        assert!(transport.send_to(b"buz:2|c", "localhost", 8125).is_err());
    }

    #[test]
    fn test_spy_transport_closed() {
        let (rx, transport) = SpyTransport::new();
        transport.close();

        let err = transport.send_to(b"buz:1|c", "localhost", 8125).unwrap_err();
        assert_eq!(io::ErrorKind::NotConnected, err.kind());
        assert!(rx.try_recv().is_err());
    }
}
