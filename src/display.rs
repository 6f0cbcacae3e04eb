//! Presentation helpers for connection lists: relative timestamps, score
//! tiers and the named sort orders.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};

use crate::state::Connection;

/// Scores at or above this are shown as high.
pub const HIGH_SCORE_THRESHOLD: i64 = 85;

/// Convert epoch milliseconds to a UTC timestamp.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Humanized offset between `then` and `now`, e.g. "5 minutes ago" or
/// "in 2 days".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta.num_milliseconds() < 0;
    let secs = (delta.num_milliseconds().abs() as f64) / 1000.0;

    let minutes = secs / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    let phrase = if secs < 45.0 {
        "a few seconds".to_string()
    } else if secs < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes.round() as i64)
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours.round() as i64)
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days.round() as i64)
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        // Rounding can land on 1 just past the "a month" edge
        format!("{} months", ((days / 30.4).round() as i64).max(2))
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{} years", (days / 365.0).round() as i64)
    };

    if future {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

/// Coarse score bucket used to colour scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Low,
}

impl ScoreTier {
    pub fn of(score: i64) -> Self {
        if score >= HIGH_SCORE_THRESHOLD {
            ScoreTier::High
        } else {
            ScoreTier::Low
        }
    }
}

/// Named orderings for the connection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionsSort {
    ByNameAscending,
    ByNameDescending,
    ByScoreAscending,
    ByScoreDescending,
    ByDateAddedAscending,
    ByDateAddedDescending,
}

impl ConnectionsSort {
    pub const ALL: [ConnectionsSort; 6] = [
        ConnectionsSort::ByNameAscending,
        ConnectionsSort::ByNameDescending,
        ConnectionsSort::ByScoreAscending,
        ConnectionsSort::ByScoreDescending,
        ConnectionsSort::ByDateAddedAscending,
        ConnectionsSort::ByDateAddedDescending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionsSort::ByNameAscending => "byNameAscending",
            ConnectionsSort::ByNameDescending => "byNameDescending",
            ConnectionsSort::ByScoreAscending => "byScoreAscending",
            ConnectionsSort::ByScoreDescending => "byScoreDescending",
            ConnectionsSort::ByDateAddedAscending => "byDateAddedAscending",
            ConnectionsSort::ByDateAddedDescending => "byDateAddedDescending",
        }
    }

    fn compare(self, a: &Connection, b: &Connection) -> Ordering {
        let by_name = || {
            let an = a.name.as_deref().unwrap_or_default().to_lowercase();
            let bn = b.name.as_deref().unwrap_or_default().to_lowercase();
            an.cmp(&bn)
        };
        match self {
            ConnectionsSort::ByNameAscending => by_name(),
            ConnectionsSort::ByNameDescending => by_name().reverse(),
            ConnectionsSort::ByScoreAscending => a.score.cmp(&b.score),
            ConnectionsSort::ByScoreDescending => b.score.cmp(&a.score),
            ConnectionsSort::ByDateAddedAscending => a.connection_date.cmp(&b.connection_date),
            ConnectionsSort::ByDateAddedDescending => b.connection_date.cmp(&a.connection_date),
        }
    }
}

impl fmt::Display for ConnectionsSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionsSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConnectionsSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = ConnectionsSort::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown sort '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Stable sort of `connections` by `sort`.
pub fn sort_connections(connections: &mut [Connection], sort: ConnectionsSort) {
    connections.sort_by(|a, b| sort.compare(a, b));
}
