// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::transport::core::{closed_error, Completion, Datagram, Transport, TransportStats};
use crossbeam_channel::{self, Receiver, Sender, TrySendError};
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Unit of work handed to the network thread
enum Job {
    Send(Datagram, Completion),
    Close,
}

/// Implementation of a `Transport` that wraps another implementation and
/// uses it to write datagrams asynchronously, in another thread.
///
/// Datagrams dispatched to this transport are queued and written by the
/// wrapped transport running in a separate thread. The completion of each
/// datagram is invoked from that thread once the wrapped transport returns,
/// so callers never block on network I/O.
///
/// The thread used for network operations is created and started when the
/// `QueuingTransport` is created. It is stopped when the transport is closed
/// or destroyed. Datagrams already queued when `.close()` is called are
/// written before the wrapped transport is closed.
///
/// This transport may be created with either a bounded or unbounded queue.
/// When an unbounded queue is used, datagrams will always be accepted and
/// queued until they can be drained by the network thread. With a bounded
/// queue, datagrams dispatched while the queue is full are not accepted and
/// their completion is invoked immediately with an error.
///
/// # Example
///
/// ```no_run
/// use tempo::{QueuingTransport, UdpTransport};
///
/// let udp = UdpTransport::bind().unwrap();
/// let queuing = QueuingTransport::with_capacity(udp, 512 * 1024);
/// ```
pub struct QueuingTransport {
    network: Arc<NetworkThread>,
    closed: AtomicBool,
}

impl QueuingTransport {
    /// Construct a new `QueuingTransport` wrapping another transport with
    /// an unbounded queue connecting them.
    pub fn from<T>(transport: T) -> Self
    where
        T: Transport + Send + Sync + 'static,
    {
        Self::with_optional_capacity(transport, None)
    }

    /// Construct a new `QueuingTransport` wrapping another transport with
    /// a queue of the given size connecting them.
    pub fn with_capacity<T>(transport: T, capacity: usize) -> Self
    where
        T: Transport + Send + Sync + 'static,
    {
        Self::with_optional_capacity(transport, Some(capacity))
    }

    fn with_optional_capacity<T>(transport: T, capacity: Option<usize>) -> Self
    where
        T: Transport + Send + Sync + 'static,
    {
        let network = Arc::new(NetworkThread::new(Arc::new(transport), capacity));
        NetworkThread::spawn(&network);

        QueuingTransport {
            network,
            closed: AtomicBool::new(false),
        }
    }

    /// Return the number of times the wrapped transport has panicked and
    /// the network thread needed to be restarted.
    pub fn panics(&self) -> u64 {
        self.network.panics.load(Ordering::Acquire)
    }

    /// Return the number of currently queued datagrams. Note that due to the
    /// way this number is computed (submitted - drained), it is necessarily
    /// approximate.
    pub fn queued(&self) -> u64 {
        self.submitted().saturating_sub(self.drained())
    }

    /// Return the number of datagrams successfully submitted to the queue.
    pub fn submitted(&self) -> u64 {
        self.network.submitted.load(Ordering::Acquire)
    }

    /// Return the number of datagrams removed from the queue to be written
    /// by the wrapped transport.
    pub fn drained(&self) -> u64 {
        self.network.drained.load(Ordering::Acquire)
    }
}

impl Transport for QueuingTransport {
    fn send_to(&self, payload: &[u8], host: &str, port: u16) -> io::Result<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(closed_error());
        }

        self.network.wrapped.send_to(payload, host, port)
    }

    fn dispatch(&self, datagram: Datagram, done: Completion) {
        if self.closed.load(Ordering::Acquire) {
            done(Err(closed_error()));
            return;
        }

        match self.network.submit(Job::Send(datagram, done)) {
            Ok(_) => {}
            Err(TrySendError::Full(Some(Job::Send(_, done)))) => {
                done(Err(io::Error::new(io::ErrorKind::Other, "channel full")));
            }
            Err(TrySendError::Disconnected(Some(Job::Send(_, done)))) => {
                done(Err(io::Error::new(io::ErrorKind::Other, "channel disconnected")));
            }
            Err(_) => {}
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        // Close from the network thread so that everything queued before
        // this point is written first. If the queue won't take the job, close
        // the wrapped transport from here.
        if self.network.submit(Job::Close).is_err() {
            self.network.wrapped.close();
        }
        self.network.stop();
    }

    fn stats(&self) -> TransportStats {
        self.network.wrapped.stats()
    }
}

impl Drop for QueuingTransport {
    /// Signal the network thread to stop once the queue is drained, without
    /// waiting for it.
    fn drop(&mut self) {
        self.network.stop();
    }
}

impl fmt::Debug for QueuingTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QueuingTransport {{ network: {:?}, closed: {:?} }}",
            self.network, self.closed
        )
    }
}

/// Queue of jobs and the wrapped transport they are run against, shared
/// between a `QueuingTransport` and its network thread.
///
/// The thread stops when it receives `None` from the queue. Jobs queued
/// after that are dropped with the queue, and so are their completions.
struct NetworkThread {
    wrapped: Arc<dyn Transport + Send + Sync>,
    sender: Sender<Option<Job>>,
    receiver: Receiver<Option<Job>>,
    panics: AtomicU64,
    submitted: AtomicU64,
    drained: AtomicU64,
    stopped: AtomicBool,
}

impl NetworkThread {
    fn new(wrapped: Arc<dyn Transport + Send + Sync>, capacity: Option<usize>) -> Self {
        let (sender, receiver) = match capacity {
            Some(v) => crossbeam_channel::bounded(v),
            None => crossbeam_channel::unbounded(),
        };

        NetworkThread {
            wrapped,
            sender,
            receiver,
            panics: AtomicU64::new(0),
            submitted: AtomicU64::new(0),
            drained: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
        }
    }

    /// Start a thread draining the queue. If the wrapped transport panics,
    /// a replacement thread picks up where it left off.
    fn spawn(network: &Arc<NetworkThread>) -> thread::JoinHandle<()> {
        let network = Arc::clone(network);
        thread::spawn(move || {
            let _restart = RestartOnPanic { network: &network };
            network.run();
        })
    }

    fn submit(&self, job: Job) -> Result<(), TrySendError<Option<Job>>> {
        self.sender.try_send(Some(job))?;
        self.submitted.fetch_add(1, Ordering::Release);
        Ok(())
    }

    fn run(&self) {
        while let Ok(Some(job)) = self.receiver.recv() {
            self.drained.fetch_add(1, Ordering::Release);
            match job {
                Job::Send(datagram, done) => self.wrapped.dispatch(datagram, done),
                Job::Close => {
                    debug!("closing wrapped transport from network thread");
                    self.wrapped.close();
                }
            }
        }

        debug!("network thread stopped");
        self.stopped.store(true, Ordering::Release);
    }

    fn stop(&self) {
        let _ = self.sender.try_send(None);
    }

    #[cfg(test)]
    fn wait_until_stopped(&self) {
        while !self.stopped.load(Ordering::Acquire) {
            thread::yield_now();
        }
    }
}

impl fmt::Debug for NetworkThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NetworkThread {{ panics: {:?}, submitted: {:?}, drained: {:?}, stopped: {:?} }}",
            self.panics, self.submitted, self.drained, self.stopped
        )
    }
}

/// Spawns a new network thread when dropped during a panic of the current
/// one.
struct RestartOnPanic<'a> {
    network: &'a Arc<NetworkThread>,
}

impl<'a> Drop for RestartOnPanic<'a> {
    fn drop(&mut self) {
        if thread::panicking() {
            warn!("network thread panicked, restarting it");
            self.network.panics.fetch_add(1, Ordering::Release);
            NetworkThread::spawn(self.network);
        }
    }
}
