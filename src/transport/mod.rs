// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod core;
mod queuing;
mod spy;
mod udp;

pub use crate::transport::core::{Completion, Datagram, NopTransport, Transport, TransportStats};
pub use crate::transport::queuing::QueuingTransport;
pub use crate::transport::spy::SpyTransport;
pub use crate::transport::udp::UdpTransport;
