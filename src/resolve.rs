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
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

/// Trait for looking up the address of the Statsd server by name.
///
/// A resolver is only used when the client is built with DNS caching
/// enabled, and then only once, in a background thread.
pub trait Resolver {
    fn resolve(&self, host: &str) -> io::Result<IpAddr>;
}

/// `Resolver` that asks the operating system, picking the first IPv4
/// address returned, or the first address of any family if there is none.
///
/// The default socket of the client is bound to an IPv4 address.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve(&self, host: &str) -> io::Result<IpAddr> {
        prefer_ipv4((host, 0).to_socket_addrs()?)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses yielded"))
    }
}

fn prefer_ipv4<I>(addrs: I) -> Option<IpAddr>
where
    I: IntoIterator<Item = SocketAddr>,
{
    let mut first = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr.ip());
        }
        first.get_or_insert(addr.ip());
    }

    first
}

/// Destination host shared between the client and a pending resolution.
#[derive(Debug, Clone)]
pub(crate) struct SharedHost {
    inner: Arc<RwLock<String>>,
}

impl SharedHost {
    pub(crate) fn new(host: String) -> Self {
        SharedHost {
            inner: Arc::new(RwLock::new(host)),
        }
    }

    pub(crate) fn get(&self) -> String {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, host: String) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = host;
    }
}

/// Resolve the current host once, in a new thread, and replace it with the
/// resolved address on success. Failures are logged and leave the host as
/// it was. There are no retries.
pub(crate) fn resolve_in_background(
    resolver: Arc<dyn Resolver + Send + Sync>,
    host: SharedHost,
) -> thread::JoinHandle<()> {
    let name = host.get();

    thread::spawn(move || match resolver.resolve(&name) {
        Ok(addr) => {
            debug!("resolved statsd host {} to {}", name, addr);
            host.set(addr.to_string());
        }
        Err(e) => {
            warn!("unable to resolve statsd host {}, using it unresolved: {}", name, e);
        }
    })
}
