// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{ErrorKind, MetricError, MetricResult};
use crate::{DEFAULT_HOST, DEFAULT_PORT};

/// Settings for a `StatsdClient`.
///
/// The record form and the positional form (`ClientConfig::new`) describe
/// the same configuration:
///
/// ```
/// use tempo::ClientConfig;
///
/// let positional = ClientConfig::new("metrics.example.com", 1234);
/// let record = ClientConfig {
///     host: "metrics.example.com".to_string(),
///     port: 1234,
///     ..Default::default()
/// };
///
/// assert_eq!(positional, record);
/// ```
///
/// The prefix and suffix are added verbatim around every stat name, no
/// separator is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub prefix: String,
    pub suffix: String,
    /// Simulate every send as a success without any network I/O
    pub mock: bool,
    /// Resolve `host` once, in the background, and send to the resolved
    /// address afterwards
    pub cache_dns: bool,
}

impl ClientConfig {
    pub fn new<H>(host: H, port: u16) -> Self
    where
        H: Into<String>,
    {
        ClientConfig {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> MetricResult<()> {
        if self.port == 0 {
            return Err(MetricError::from((ErrorKind::InvalidInput, "port must be positive")));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            prefix: String::new(),
            suffix: String::new(),
            mock: false,
            cache_dns: false,
        }
    }
}
