// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::client::StatsdClient;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, OnceLock};

/// Process-wide default client, empty until `set_global_default`
static HOLDER: SingletonHolder<StatsdClient> = SingletonHolder::new();

/// Holder allowing a value to be read from many threads and written a
/// single time.
#[derive(Debug, Default)]
pub(crate) struct SingletonHolder<T> {
    value: OnceLock<Arc<T>>,
}

impl<T> SingletonHolder<T> {
    pub(crate) const fn new() -> Self {
        SingletonHolder { value: OnceLock::new() }
    }

    pub(crate) fn get(&self) -> Option<Arc<T>> {
        self.value.get().cloned()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.value.get().is_some()
    }

    /// Set the value if it has not already been set. Returns false and drops
    /// `val` otherwise.
    pub(crate) fn set(&self, val: T) -> bool {
        self.value.set(Arc::new(val)).is_ok()
    }
}

/// Error indicating that a global default `StatsdClient` was not set
/// when a call to `get_global_default` was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalDefaultNotSet;

impl Display for GlobalDefaultNotSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt("global default StatsdClient instance not set", f)
    }
}

impl Error for GlobalDefaultNotSet {}

/// Set the global default `StatsdClient` instance.
///
/// The first client set wins. If a default has already been set the given
/// client is dropped, left unclosed, and `false` is returned.
///
/// # Example
///
/// ```
/// use tempo::StatsdClient;
///
/// let client = StatsdClient::builder().prefix("my.app.").mock(true).build().unwrap();
/// tempo::set_global_default(client);
/// ```
pub fn set_global_default(client: StatsdClient) -> bool {
    let set = HOLDER.set(client);
    if !set {
        debug!("global default statsd client already set, ignoring new client");
    }

    set
}

/// Get a reference to the global default `StatsdClient` instance
///
/// # Errors
///
/// This method will return an error if the global default has not been
/// previously set via the `set_global_default` method.
///
/// # Example
///
/// ```
/// use tempo::StatsdClient;
///
/// let global_client = tempo::get_global_default();
/// assert!(global_client.is_err());
///
/// let client = StatsdClient::builder().mock(true).build().unwrap();
/// tempo::set_global_default(client);
///
/// let global_client = tempo::get_global_default();
/// assert!(global_client.is_ok());
/// ```
pub fn get_global_default() -> Result<Arc<StatsdClient>, GlobalDefaultNotSet> {
    HOLDER.get().ok_or(GlobalDefaultNotSet)
}

/// Return true if the global default `StatsdClient` is set, false otherwise
pub fn is_global_default_set() -> bool {
    HOLDER.is_set()
}
