// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A callback-driven Statsd client for Rust!
//!
//! Tempo sends timers, counters, histograms, gauges and sets to a Statsd
//! server over UDP without ever blocking the caller on the network. The
//! outcome of each send is reported later, to a callback.
//!
//! ## Features
//!
//! * Typed operations for timers (`ms`), counters (`c`), histograms (`h`),
//!   gauges (`g`) and sets (`s`).
//! * Client side sampling with a `|@rate` suffix and tags with a `|#tag,...`
//!   suffix on every metric.
//! * Sending the same value under several names at once with a single,
//!   aggregated callback.
//! * A mock mode that reports every send as a success without network I/O.
//! * Optional one-time DNS resolution of the server host.
//! * Support for alternate backends via the `Transport` trait.
//!
//! ## Usage
//!
//! ### Simple Use
//!
//! Create a client for some imaginary metrics server and send a few
//! metrics. Errors are ignored unless an error handler or a callback is
//! given.
//!
//! ```rust,no_run
//! use tempo::{StatsdClient, DEFAULT_PORT};
//!
//! let client = StatsdClient::from_host("metrics.example.com", DEFAULT_PORT).unwrap();
//!
//! client.increment("some.counter").send();
//! client.timing("some.methodCall", 42).send();
//! client.gauge("some.thing", 7).send();
//! client.histogram("some.value", 5).with_sample_rate(0.5).send();
//! client.set("users.uniques", 42).with_tag("region:eu").send();
//! ```
//!
//! ### Callbacks
//!
//! Pass a callback with `.send_with()` to learn how many bytes were sent,
//! or why sending failed. With several names the callback runs once: with
//! the first error, or with the total number of bytes once every datagram
//! was sent. Callbacks may run on another thread.
//!
//! ```rust,no_run
//! use tempo::StatsdClient;
//!
//! let client = StatsdClient::builder()
//!     .host("metrics.example.com")
//!     .prefix("my.app.")
//!     .build()
//!     .unwrap();
//!
//! client
//!     .increment(["requests", "requests.users"])
//!     .send_with(|res| match res {
//!         Ok(bytes) => println!("sent {} bytes", bytes),
//!         Err(e) => eprintln!("unable to send: {}", e),
//!     });
//!
//! client.close();
//! ```
//!
//! ### Production Use
//!
//! The default client writes to a non-blocking UDP socket from a
//! background thread. To report failed sends that have no callback, give
//! the client an error handler. Sharing one client across an application
//! can be done through the global default.
//!
//! ```rust,no_run
//! use tempo::{MetricError, StatsdClient};
//!
//! fn on_error(err: MetricError) {
//!     eprintln!("Error sending metrics: {}", err);
//! }
//!
//! let client = StatsdClient::builder()
//!     .host("metrics.example.com")
//!     .prefix("my.app.")
//!     .cache_dns(true)
//!     .with_error_handler(on_error)
//!     .build()
//!     .unwrap();
//!
//! tempo::set_global_default(client);
//!
//! if let Ok(client) = tempo::get_global_default() {
//!     client.increment("started").send();
//! }
//! ```
//!
//! ### Custom Transports
//!
//! Anything implementing `Transport` can carry the metrics, for example the
//! `SpyTransport` used to inspect them in tests.
//!
//! ```rust
//! use tempo::{SpyTransport, StatsdClient};
//!
//! let (rx, transport) = SpyTransport::new();
//! let client = StatsdClient::builder()
//!     .prefix("my.app.")
//!     .with_transport(transport)
//!     .build()
//!     .unwrap();
//!
//! client.decrement_by("queue.size", 3).send();
//!
//! let sent = rx.try_recv().unwrap();
//! assert_eq!(b"my.app.queue.size:-3|c", sent.payload.as_slice());
//! ```

#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8125;

pub use self::batch::Callback;
pub use self::builder::{MetricBuilder, Stats};
pub use self::client::{StatsdClient, StatsdClientBuilder};
pub use self::config::ClientConfig;
pub use self::global::{get_global_default, is_global_default_set, set_global_default, GlobalDefaultNotSet};
pub use self::resolve::{Resolver, SystemResolver};
pub use self::sampling::{SampleSource, ThreadRngSource};
pub use self::transport::{
    Completion, Datagram, NopTransport, QueuingTransport, SpyTransport, Transport, TransportStats, UdpTransport,
};
pub use self::types::{ErrorKind, MetricError, MetricResult, MetricType, MetricValue};

mod batch;
mod builder;
mod client;
mod config;
mod global;
pub mod prelude;
mod resolve;
mod sampling;
mod transport;
mod types;
