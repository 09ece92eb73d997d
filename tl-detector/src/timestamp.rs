// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A timestamp: Duration since the epoch of the feed that produced it
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub Duration);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    /// Create a timestamp from (non-negative) seconds
    ///
    /// Negative or non-finite inputs saturate to [`Timestamp::ZERO`].
    pub fn from_secs_f64(secs: f64) -> Self {
        Duration::try_from_secs_f64(secs)
            .map(Timestamp)
            .unwrap_or(Timestamp::ZERO)
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl From<Timestamp> for u64 {
    fn from(tstamp: Timestamp) -> u64 {
        // Saturate instead of wrapping, ~584 years of nanoseconds
        u64::try_from(tstamp.0.as_nanos()).unwrap_or(u64::MAX)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}
