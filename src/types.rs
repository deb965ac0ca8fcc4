// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error;
use std::fmt;
use std::io;
use std::time::Duration;

/// Type of metric that knows how to display itself as the type code used
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Timer,
    Counter,
    Histogram,
    Gauge,
    Set,
}

impl MetricType {
    pub fn code(&self) -> &'static str {
        match *self {
            MetricType::Timer => "ms",
            MetricType::Counter => "c",
            MetricType::Histogram => "h",
            MetricType::Gauge => "g",
            MetricType::Set => "s",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code().fmt(f)
    }
}

/// Holder for primitive metric values that knows how to display itself
///
/// Values are written to the wire exactly as Rust displays them, no
/// validation or rounding is applied. `Duration` values are converted to
/// whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl MetricValue {
    pub(crate) fn negate(self) -> MetricValue {
        match self {
            MetricValue::Signed(v) => v
                .checked_neg()
                .map_or(MetricValue::Unsigned(v.unsigned_abs()), MetricValue::Signed),
            MetricValue::Unsigned(v) => 0i64
                .checked_sub_unsigned(v)
                .map_or(MetricValue::Float(-(v as f64)), MetricValue::Signed),
            MetricValue::Float(v) => MetricValue::Float(-v),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Signed(v) => v.fmt(f),
            MetricValue::Unsigned(v) => v.fmt(f),
            MetricValue::Float(v) => v.fmt(f),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Signed(v)
    }
}

impl From<i32> for MetricValue {
    fn from(v: i32) -> Self {
        MetricValue::Signed(i64::from(v))
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Unsigned(v)
    }
}

impl From<u32> for MetricValue {
    fn from(v: u32) -> Self {
        MetricValue::Unsigned(u64::from(v))
    }
}

impl From<usize> for MetricValue {
    fn from(v: usize) -> Self {
        MetricValue::Unsigned(v as u64)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<Duration> for MetricValue {
    fn from(v: Duration) -> Self {
        MetricValue::Unsigned(u64::try_from(v.as_millis()).unwrap_or(u64::MAX))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    InvalidInput,
    IoError,
}

/// Error generated when constructing a client or sending a metric.
///
/// Transmission errors are never raised from the calling thread. They are
/// handed to the completion callback of the metric that failed (or to the
/// error handler of the client if no callback was given).
#[derive(Debug)]
pub struct MetricError {
    repr: ErrorRepr,
}

#[derive(Debug)]
enum ErrorRepr {
    WithDescription(ErrorKind, &'static str),
    IoError(io::Error),
}

impl MetricError {
    /// Return the kind of the error
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::IoError(_) => ErrorKind::IoError,
            ErrorRepr::WithDescription(kind, _) => kind,
        }
    }

    /// Return the underlying I/O error, if any
    pub fn io_error(&self) -> Option<&io::Error> {
        match self.repr {
            ErrorRepr::IoError(ref err) => Some(err),
            ErrorRepr::WithDescription(_, _) => None,
        }
    }
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            ErrorRepr::IoError(ref err) => err.fmt(f),
            ErrorRepr::WithDescription(_, desc) => desc.fmt(f),
        }
    }
}

impl error::Error for MetricError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.repr {
            ErrorRepr::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MetricError {
    fn from(err: io::Error) -> MetricError {
        MetricError {
            repr: ErrorRepr::IoError(err),
        }
    }
}

impl From<(ErrorKind, &'static str)> for MetricError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> MetricError {
        MetricError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

pub type MetricResult<T> = Result<T, MetricError>;

#[cfg(test)]
mod tests {
    use super::{ErrorKind, MetricError, MetricType, MetricValue};
    use std::error::Error;
    use std::io;
    use std::time::Duration;

    #[test]
    fn test_metric_type_codes() {
        assert_eq!("ms", MetricType::Timer.to_string());
        assert_eq!("c", MetricType::Counter.to_string());
        assert_eq!("h", MetricType::Histogram.to_string());
        assert_eq!("g", MetricType::Gauge.to_string());
        assert_eq!("s", MetricType::Set.to_string());
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!("-3", MetricValue::from(-3i64).to_string());
        assert_eq!("42", MetricValue::from(42u64).to_string());
        assert_eq!("1.5", MetricValue::from(1.5).to_string());
        assert_eq!("2", MetricValue::from(2.0).to_string());
        assert_eq!("NaN", MetricValue::from(f64::NAN).to_string());
    }

    #[test]
    fn test_metric_value_duration_as_millis() {
        assert_eq!(MetricValue::Unsigned(1500), MetricValue::from(Duration::from_micros(1_500_900)));
        assert_eq!(MetricValue::Unsigned(u64::MAX), MetricValue::from(Duration::from_secs(u64::MAX)));
    }

    #[test]
    fn test_metric_value_negate() {
        assert_eq!(MetricValue::Signed(-5), MetricValue::Signed(5).negate());
        assert_eq!(MetricValue::Signed(-5), MetricValue::Unsigned(5).negate());
        assert_eq!(MetricValue::Float(-0.5), MetricValue::Float(0.5).negate());
    }

    #[test]
    fn test_metric_value_negate_extremes() {
        assert_eq!(MetricValue::Unsigned(9_223_372_036_854_775_808), MetricValue::Signed(i64::MIN).negate());
        assert_eq!("9223372036854775808", MetricValue::Signed(i64::MIN).negate().to_string());
        assert_eq!(MetricValue::Signed(i64::MIN), MetricValue::Unsigned(i64::MIN.unsigned_abs()).negate());
        assert_eq!(MetricValue::Signed(-i64::MAX), MetricValue::Signed(i64::MAX).negate());
        assert_eq!(MetricValue::Float(-(u64::MAX as f64)), MetricValue::Unsigned(u64::MAX).negate());
    }

    #[test]
    fn test_metric_error_from_io() {
        let err = MetricError::from(io::Error::new(io::ErrorKind::Other, "boom"));

        assert_eq!(ErrorKind::IoError, err.kind());
        assert!(err.io_error().is_some());
        assert!(err.source().is_some());
        assert_eq!("boom", err.to_string());
    }

    #[test]
    fn test_metric_error_with_description() {
        let err = MetricError::from((ErrorKind::InvalidInput, "port must be positive"));

        assert_eq!(ErrorKind::InvalidInput, err.kind());
        assert!(err.io_error().is_none());
        assert!(err.source().is_none());
        assert_eq!("port must be positive", err.to_string());
    }
}
