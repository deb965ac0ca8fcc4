// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export the traits of Tempo for easy glob imports
//!
//! Needed when implementing a custom transport, resolver or source of
//! random numbers.
//!
//! # Example
//!
//! ```
//! use std::io;
//! use tempo::prelude::*;
//! use tempo::StatsdClient;
//!
//! struct DiscardTransport;
//!
//! impl Transport for DiscardTransport {
//!     fn send_to(&self, payload: &[u8], _host: &str, _port: u16) -> io::Result<usize> {
//!         Ok(payload.len())
//!     }
//! }
//!
//! let client = StatsdClient::builder()
//!     .with_transport(DiscardTransport)
//!     .build()
//!     .unwrap();
//!
//! client.gauge("some.gauge", 45).send();
//! ```

pub use crate::resolve::Resolver;
pub use crate::sampling::SampleSource;
pub use crate::transport::Transport;
