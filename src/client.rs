// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::batch::{Callback, PendingBatch};
use crate::builder::{MetricBuilder, MetricFormatter, Stats};
use crate::config::ClientConfig;
use crate::resolve::{resolve_in_background, Resolver, SharedHost, SystemResolver};
use crate::sampling::{sample, Sample, SampleSource, ThreadRngSource};
use crate::transport::{Datagram, NopTransport, QueuingTransport, Transport, TransportStats, UdpTransport};
use crate::types::{MetricError, MetricResult, MetricType, MetricValue};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type ErrorHandler = Arc<dyn Fn(MetricError) + Sync + Send>;

/// Builder for creating and customizing `StatsdClient` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `StatsdClient` struct.
///
/// # Example
///
/// ```
/// use tempo::{MetricError, StatsdClient, NopTransport};
///
/// fn my_error_handler(err: MetricError) {
///     println!("Metric error! {}", err);
/// }
///
/// let client = StatsdClient::builder()
///     .host("metrics.example.com")
///     .port(8125)
///     .prefix("my.app.")
///     .with_transport(NopTransport)
///     .with_error_handler(my_error_handler)
///     .build()
///     .unwrap();
///
/// client.increment("requests").send();
/// ```
pub struct StatsdClientBuilder {
    config: ClientConfig,
    transport: Option<Box<dyn Transport + Sync + Send>>,
    resolver: Arc<dyn Resolver + Sync + Send>,
    sampler: Box<dyn SampleSource + Sync + Send>,
    errors: ErrorHandler,
}

impl StatsdClientBuilder {
    fn new() -> Self {
        StatsdClientBuilder {
            config: ClientConfig::default(),
            transport: None,
            resolver: Arc::new(SystemResolver),
            sampler: Box::new(ThreadRngSource),
            errors: Arc::new(nop_error_handler),
        }
    }

    /// Replace all settings with those of the given configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Host name or IP address of the Statsd server, `localhost` by default.
    pub fn host<H>(mut self, host: H) -> Self
    where
        H: Into<String>,
    {
        self.config.host = host.into();
        self
    }

    /// Port of the Statsd server, `8125` by default.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// String prepended verbatim to every stat name.
    pub fn prefix<P>(mut self, prefix: P) -> Self
    where
        P: Into<String>,
    {
        self.config.prefix = prefix.into();
        self
    }

    /// String appended verbatim to every stat name.
    pub fn suffix<S>(mut self, suffix: S) -> Self
    where
        S: Into<String>,
    {
        self.config.suffix = suffix.into();
        self
    }

    /// Simulate every send as a success without touching the network.
    pub fn mock(mut self, mock: bool) -> Self {
        self.config.mock = mock;
        self
    }

    /// Resolve the host once when the client is built and send to the
    /// resolved address from then on.
    pub fn cache_dns(mut self, cache_dns: bool) -> Self {
        self.config.cache_dns = cache_dns;
        self
    }

    /// Use the given transport instead of a UDP socket.
    ///
    /// By default the client binds a non-blocking UDP socket and writes
    /// to it from a background thread (a `UdpTransport` wrapped in a
    /// `QueuingTransport`). In mock mode no socket is bound.
    pub fn with_transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + Sync + Send + 'static,
    {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Use the given resolver when DNS caching is enabled.
    pub fn with_resolver<R>(mut self, resolver: R) -> Self
    where
        R: Resolver + Sync + Send + 'static,
    {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Use the given source of random numbers for sampling.
    pub fn with_sample_source<S>(mut self, sampler: S) -> Self
    where
        S: SampleSource + Sync + Send + 'static,
    {
        self.sampler = Box::new(sampler);
        self
    }

    /// Set an error handler for metrics sent via `MetricBuilder::send()`.
    ///
    /// The error handler is only invoked for metrics sent without a
    /// callback, when they could not be written by the transport. It may
    /// run on the network thread and should consume the error without
    /// panicking.
    pub fn with_error_handler<F>(mut self, errors: F) -> Self
    where
        F: Fn(MetricError) + Sync + Send + 'static,
    {
        self.errors = Arc::new(errors);
        self
    }

    /// Construct a new `StatsdClient` instance based on current settings.
    ///
    /// # Failures
    ///
    /// This method fails if the port is zero or if the default UDP socket
    /// cannot be bound.
    pub fn build(self) -> MetricResult<StatsdClient> {
        self.config.validate()?;

        let transport: Box<dyn Transport + Sync + Send> = match self.transport {
            Some(t) => t,
            None if self.config.mock => Box::new(NopTransport),
            None => Box::new(QueuingTransport::from(UdpTransport::bind()?)),
        };

        let host = SharedHost::new(self.config.host.clone());
        if self.config.cache_dns {
            resolve_in_background(self.resolver, host.clone());
        }

        Ok(StatsdClient {
            config: self.config,
            host,
            transport,
            sampler: self.sampler,
            errors: self.errors,
        })
    }
}

impl fmt::Debug for StatsdClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsdClientBuilder {{ config: {:?}, transport: ..., resolver: ..., sampler: ..., errors: ... }}",
            self.config
        )
    }
}

/// Client for Statsd that sends timers, counters, histograms, gauges and
/// sets over UDP.
///
/// Every method returns a `MetricBuilder` to optionally add a sample rate
/// and tags before sending. Sending never blocks on the network and never
/// fails in the calling thread: the outcome is reported later to the
/// callback given to `.send_with()`, or to the error handler of the client.
///
/// Each method accepts a single stat name or a list of names. With a list,
/// the same value is sent under every name as independent datagrams.
///
/// # Threading
///
/// The client is `Send` and `Sync` and may be shared between threads with
/// an `Arc`. Closing the client while other threads are still sending is
/// the responsibility of the caller: those sends fail with whatever error
/// the transport reports once it is closed.
///
/// # Example
///
/// ```no_run
/// use tempo::StatsdClient;
///
/// let client = StatsdClient::from_host("metrics.example.com", 8125).unwrap();
///
/// client.timing("api.response", 42).with_tag("route:/users").send();
/// client.increment(["api.hits", "api.users.hits"]).send_with(|res| match res {
///     Ok(bytes) => println!("sent {} bytes", bytes),
///     Err(e) => eprintln!("failed: {}", e),
/// });
///
/// client.close();
/// ```
pub struct StatsdClient {
    config: ClientConfig,
    host: SharedHost,
    transport: Box<dyn Transport + Sync + Send>,
    sampler: Box<dyn SampleSource + Sync + Send>,
    errors: ErrorHandler,
}

impl StatsdClient {
    /// Create a client from a complete configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use tempo::{ClientConfig, StatsdClient};
    ///
    /// let client = StatsdClient::new(ClientConfig {
    ///     prefix: "my.app.".to_string(),
    ///     mock: true,
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// ```
    pub fn new(config: ClientConfig) -> MetricResult<Self> {
        Self::builder().with_config(config).build()
    }

    /// Create a client for the given server with default settings
    /// otherwise.
    pub fn from_host<H>(host: H, port: u16) -> MetricResult<Self>
    where
        H: Into<String>,
    {
        Self::new(ClientConfig::new(host, port))
    }

    /// Create a new builder with default settings.
    ///
    /// General defaults:
    ///
    /// * host `localhost`, port `8125`, empty prefix and suffix
    /// * mock mode and DNS caching disabled
    /// * a UDP socket written to from a background thread
    /// * a no-op error handler
    pub fn builder() -> StatsdClientBuilder {
        StatsdClientBuilder::new()
    }

    /// Record a timing in milliseconds
    pub fn timing<'m, S, V>(&self, stats: S, value: V) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
        V: Into<MetricValue>,
    {
        MetricBuilder::new(self, stats.into(), value.into(), MetricType::Timer)
    }

    /// Increment a counter by one
    pub fn increment<'m, S>(&self, stats: S) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
    {
        self.increment_by(stats, 1)
    }

    /// Increment a counter by the given amount
    pub fn increment_by<'m, S, V>(&self, stats: S, value: V) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
        V: Into<MetricValue>,
    {
        MetricBuilder::new(self, stats.into(), value.into(), MetricType::Counter)
    }

    /// Decrement a counter by one
    pub fn decrement<'m, S>(&self, stats: S) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
    {
        self.decrement_by(stats, 1)
    }

    /// Decrement a counter by the given amount, `decrement_by("x", 5)`
    /// sends `x:-5|c`
    pub fn decrement_by<'m, S, V>(&self, stats: S, value: V) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
        V: Into<MetricValue>,
    {
        let value: MetricValue = value.into();
        MetricBuilder::new(self, stats.into(), value.negate(), MetricType::Counter)
    }

    /// Record a histogram value
    pub fn histogram<'m, S, V>(&self, stats: S, value: V) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
        V: Into<MetricValue>,
    {
        MetricBuilder::new(self, stats.into(), value.into(), MetricType::Histogram)
    }

    /// Record a gauge value
    pub fn gauge<'m, S, V>(&self, stats: S, value: V) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
        V: Into<MetricValue>,
    {
        MetricBuilder::new(self, stats.into(), value.into(), MetricType::Gauge)
    }

    /// Record a value in a set of unique values
    pub fn set<'m, S, V>(&self, stats: S, value: V) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
        V: Into<MetricValue>,
    {
        MetricBuilder::new(self, stats.into(), value.into(), MetricType::Set)
    }

    /// Alias for `set`
    pub fn unique<'m, S, V>(&self, stats: S, value: V) -> MetricBuilder<'m, '_>
    where
        S: Into<Stats<'m>>,
        V: Into<MetricValue>,
    {
        self.set(stats, value)
    }

    /// Close the underlying transport.
    ///
    /// Metrics sent after this are reported as failed by the transport.
    pub fn close(&self) {
        debug!("closing statsd client for {}:{}", self.host.get(), self.config.port);
        self.transport.close();
    }

    /// Host metrics are currently sent to. This is the resolved address
    /// once DNS caching has completed.
    pub fn host(&self) -> String {
        self.host.get()
    }

    /// Port metrics are sent to.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Configuration the client was built with. The host is the one given,
    /// never the resolved address.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether sends are simulated as successes without network I/O.
    pub fn is_mock(&self) -> bool {
        self.config.mock
    }

    /// Return I/O telemetry of the underlying transport.
    pub fn stats(&self) -> TransportStats {
        self.transport.stats()
    }

    /// Send a metric under every given name.
    ///
    /// Names are sampled before anything is sent, so the callback only
    /// waits on datagrams actually handed to the transport. Without a
    /// callback, errors are handed to the error handler of the client
    /// instead.
    pub(crate) fn send_all(
        &self,
        stats: Stats<'_>,
        value: MetricValue,
        type_: MetricType,
        rate: Option<f64>,
        tags: &[Cow<'_, str>],
        callback: Option<Callback>,
    ) {
        let callback = callback.unwrap_or_else(|| self.error_callback());

        let lines: Vec<String> = match stats {
            Stats::One(name) => self.encode(&name, value, type_, rate, tags).into_iter().collect(),
            Stats::Many(names) if names.is_empty() => {
                callback(Ok(0));
                return;
            }
            Stats::Many(names) => names
                .iter()
                .filter_map(|name| self.encode(name, value, type_, rate, tags))
                .collect(),
        };

        if lines.is_empty() {
            return;
        }

        if self.config.mock {
            callback(Ok(0));
            return;
        }

        let batch = PendingBatch::new(lines.len(), callback);
        let host = self.host.get();
        for line in lines {
            let datagram = Datagram::new(line.into_bytes(), host.clone(), self.config.port);
            self.transport.dispatch(datagram, batch.completion());
        }
    }

    /// Encode a single metric line, `None` when sampling drops it.
    fn encode(
        &self,
        name: &str,
        value: MetricValue,
        type_: MetricType,
        rate: Option<f64>,
        tags: &[Cow<'_, str>],
    ) -> Option<String> {
        let mut formatter = MetricFormatter::new(&self.config.prefix, name, &self.config.suffix, value, type_);

        match sample(&*self.sampler, rate) {
            Sample::Dropped => {
                trace!("dropping {} by sampling", name);
                return None;
            }
            Sample::Kept(rate) => {
                formatter = formatter.with_sample_rate(rate);
            }
            Sample::Always => {}
        }

        Some(formatter.with_tags(tags).format())
    }

    fn error_callback(&self) -> Callback {
        let errors = Arc::clone(&self.errors);
        Box::new(move |res| {
            if let Err(e) = res {
                errors(e);
            }
        })
    }
}

impl fmt::Debug for StatsdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsdClient {{ config: {:?}, host: {:?}, transport: ..., sampler: ..., errors: ... }}",
            self.config,
            self.host.get(),
        )
    }
}

#[allow(clippy::needless_pass_by_value)]
fn nop_error_handler(_err: MetricError) {
    // nothing
}
