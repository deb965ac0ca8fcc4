// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rand::Rng;

/// Source of uniformly distributed random numbers used to decide which
/// sampled metrics are sent.
///
/// The client uses `ThreadRngSource` unless another source is given to
/// `StatsdClientBuilder::with_sample_source`. Any `Fn() -> f64` closure
/// may be used as a source, which is mostly useful for tests.
pub trait SampleSource {
    /// Return a value in `[0, 1)`.
    fn next_f64(&self) -> f64;
}

/// `SampleSource` backed by the thread-local generator from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl SampleSource for ThreadRngSource {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

impl<F> SampleSource for F
where
    F: Fn() -> f64,
{
    fn next_f64(&self) -> f64 {
        (self)()
    }
}

/// Outcome of the sampling decision for a single metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Sample {
    /// No rate below one was given, send without a rate suffix
    Always,
    /// The metric survived sampling at this rate
    Kept(f64),
    /// The metric must not be sent
    Dropped,
}

/// Decide whether a metric with the given rate is sent.
///
/// Only rates strictly below one draw a random number. A rate of zero or
/// less drops every metric since draws are never below it.
pub(crate) fn sample(source: &dyn SampleSource, rate: Option<f64>) -> Sample {
    match rate {
        Some(rate) if rate < 1.0 => {
            if source.next_f64() < rate {
                Sample::Kept(rate)
            } else {
                Sample::Dropped
            }
        }
        _ => Sample::Always,
    }
}
