// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::batch::Callback;
use crate::client::StatsdClient;
use crate::types::{MetricResult, MetricType, MetricValue};
use std::borrow::Cow;
use std::fmt::Write;

/// One or more stat names to send the same value under.
///
/// Values of this type are usually created implicitly from a `&str`,
/// `String`, or a slice, array or vector of either, when calling one of
/// the methods of `StatsdClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stats<'a> {
    One(Cow<'a, str>),
    Many(Vec<Cow<'a, str>>),
}

impl<'a> From<&'a str> for Stats<'a> {
    fn from(name: &'a str) -> Self {
        Stats::One(Cow::Borrowed(name))
    }
}

impl<'a> From<&'a String> for Stats<'a> {
    fn from(name: &'a String) -> Self {
        Stats::One(Cow::Borrowed(name.as_str()))
    }
}

impl From<String> for Stats<'static> {
    fn from(name: String) -> Self {
        Stats::One(Cow::Owned(name))
    }
}

impl<'a> From<&'a [&'a str]> for Stats<'a> {
    fn from(names: &'a [&'a str]) -> Self {
        Stats::Many(names.iter().map(|n| Cow::Borrowed(*n)).collect())
    }
}

impl<'a> From<&'a [String]> for Stats<'a> {
    fn from(names: &'a [String]) -> Self {
        Stats::Many(names.iter().map(|n| Cow::Borrowed(n.as_str())).collect())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Stats<'a> {
    fn from(names: [&'a str; N]) -> Self {
        Stats::Many(names.iter().map(|n| Cow::Borrowed(*n)).collect())
    }
}

impl<'a> From<Vec<&'a str>> for Stats<'a> {
    fn from(names: Vec<&'a str>) -> Self {
        Stats::Many(names.into_iter().map(Cow::Borrowed).collect())
    }
}

impl From<Vec<String>> for Stats<'static> {
    fn from(names: Vec<String>) -> Self {
        Stats::Many(names.into_iter().map(Cow::Owned).collect())
    }
}

/// Encoder for a single Statsd line.
///
/// ``` text
/// <prefix><name><suffix>:<value>|<type>[|@<rate>][|#<tag>,<tag>...]
/// ```
///
/// Nothing is validated or escaped. Names, tags and values are written
/// exactly as given.
#[derive(Debug, Clone)]
pub(crate) struct MetricFormatter<'a> {
    prefix: &'a str,
    name: &'a str,
    suffix: &'a str,
    value: MetricValue,
    type_: MetricType,
    sample_rate: Option<f64>,
    tags: &'a [Cow<'a, str>],
}

impl<'a> MetricFormatter<'a> {
    const SAMPLE_PREFIX: &'static str = "|@";
    const TAG_PREFIX: &'static str = "|#";

    pub(crate) fn new(prefix: &'a str, name: &'a str, suffix: &'a str, value: MetricValue, type_: MetricType) -> Self {
        MetricFormatter {
            prefix,
            name,
            suffix,
            value,
            type_,
            sample_rate: None,
            tags: &[],
        }
    }

    pub(crate) fn with_sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    pub(crate) fn with_tags(mut self, tags: &'a [Cow<'a, str>]) -> Self {
        self.tags = tags;
        self
    }

    #[rustfmt::skip]
    fn size_hint(&self) -> usize {
        let base = self.prefix.len() + self.name.len() + self.suffix.len()
            + 1 /* : */ + 20 /* value */ + 1 /* | */ + 2 /* type */;
        let rate = if self.sample_rate.is_some() { Self::SAMPLE_PREFIX.len() + 8 } else { 0 };
        let tags = if self.tags.is_empty() {
            0
        } else {
            // prefix, values, commas
            Self::TAG_PREFIX.len() + self.tags.iter().map(|t| t.len()).sum::<usize>() + self.tags.len() - 1
        };

        base + rate + tags
    }

    pub(crate) fn format(&self) -> String {
        let mut out = String::with_capacity(self.size_hint());
        let _ = write!(
            out,
            "{}{}{}:{}|{}",
            self.prefix, self.name, self.suffix, self.value, self.type_
        );

        if let Some(rate) = self.sample_rate {
            let _ = write!(out, "{}{}", Self::SAMPLE_PREFIX, rate);
        }

        if !self.tags.is_empty() {
            out.push_str(Self::TAG_PREFIX);
            for (i, tag) in self.tags.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(tag);
            }
        }

        out
    }
}

/// Builder for the options of an in-progress metric.
///
/// Sample rate and tags are optional and may be given in any combination
/// before the metric is finally sent with `.send()` or `.send_with()`.
///
/// NOTE: The only way to instantiate an instance of this builder is via
/// methods of the `StatsdClient` client.
///
/// # Example
///
/// ```
/// use tempo::StatsdClient;
///
/// let client = StatsdClient::builder().prefix("my.app.").mock(true).build().unwrap();
///
/// client.timing("response", 42).send();
/// client.increment("requests").with_sample_rate(0.25).send();
/// client
///     .histogram("db.query", 12.5)
///     .with_tags(["route:/users", "part:db"])
///     .send_with(|res| {
///         if let Err(e) = res {
///             eprintln!("unable to send metric: {}", e);
///         }
///     });
/// ```
#[must_use = "Did you forget to call .send() after adding options?"]
#[derive(Debug)]
pub struct MetricBuilder<'m, 'c> {
    client: &'c StatsdClient,
    stats: Stats<'m>,
    value: MetricValue,
    type_: MetricType,
    sample_rate: Option<f64>,
    tags: Vec<Cow<'m, str>>,
}

impl<'m, 'c> MetricBuilder<'m, 'c> {
    pub(crate) fn new(client: &'c StatsdClient, stats: Stats<'m>, value: MetricValue, type_: MetricType) -> Self {
        MetricBuilder {
            client,
            stats,
            value,
            type_,
            sample_rate: None,
            tags: Vec::new(),
        }
    }

    /// Send this metric only a fraction of the time.
    ///
    /// A random number is drawn for every name the metric is sent under.
    /// Metrics that are not picked are discarded without any callback being
    /// invoked. Metrics that are picked carry the rate (`|@0.25`) so that
    /// the server can scale them back up. A rate of `1` or more always sends
    /// and omits the rate.
    pub fn with_sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    /// Add a tag to this metric.
    ///
    /// Tags are written as-is, joined with commas. Use `"key:value"` for
    /// key-value tags.
    pub fn with_tag<T>(mut self, tag: T) -> Self
    where
        T: Into<Cow<'m, str>>,
    {
        self.tags.push(tag.into());
        self
    }

    /// Add several tags to this metric, in order.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'m, str>>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Send this metric, reporting transmission errors to the error handler
    /// of the client.
    pub fn send(self) {
        self.client
            .send_all(self.stats, self.value, self.type_, self.sample_rate, &self.tags, None);
    }

    /// Send this metric and invoke `callback` with the number of bytes sent
    /// or the error encountered.
    ///
    /// When the metric is sent under several names the callback is invoked
    /// once: with the first error, or with the total number of bytes once
    /// every datagram has been written. The callback may run on a different
    /// thread than the caller.
    pub fn send_with<F>(self, callback: F)
    where
        F: FnOnce(MetricResult<usize>) + Send + 'static,
    {
        let callback: Callback = Box::new(callback);
        self.client.send_all(
            self.stats,
            self.value,
            self.type_,
            self.sample_rate,
            &self.tags,
            Some(callback),
        );
    }
}
