//! GNSS time tag handling
//!
//! SPARTN frames carry either a full 32-bit time tag (seconds since
//! 2010-01-01T00:00:00Z) or an ambiguous 16-bit one counting seconds from
//! the start of the current half day. Decryption needs the full form, so
//! 16-bit tags are resolved against a reference date.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::constants::HALF_DAY_SECS;

/// Origin of SPARTN 32-bit time tags
pub fn timebase() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Seconds between the SPARTN time base and `date`, negative before it
pub fn date_to_timetag(date: DateTime<Utc>) -> i64 {
    (date - timebase()).num_seconds()
}

/// Calendar date of a 32-bit time tag
pub fn timetag_to_date(timetag: u32) -> DateTime<Utc> {
    timebase() + chrono::Duration::seconds(i64::from(timetag))
}

/// Resolve a 16-bit half-day time tag into the 32-bit form closest to `basedate`
/// (itself in 32-bit time tag seconds).
///
/// Candidates are the tag applied to the previous, current and next half day;
/// the one nearest to `basedate` wins and ties go to the earliest candidate.
pub fn resolve_timetag(timetag: u16, basedate: i64) -> u32 {
    let half_day = i64::from(HALF_DAY_SECS);
    let base = basedate - basedate.rem_euclid(half_day);
    let tag = i64::from(timetag);
    let resolved = [base - half_day + tag, base + tag, base + half_day + tag]
        .into_iter()
        .min_by_key(|candidate| (candidate - basedate).abs())
        .unwrap_or(base + tag);
    resolved.clamp(0, i64::from(u32::MAX)) as u32
}

/// Reference date for resolving 16-bit time tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Basedate {
    /// Current UTC time at the moment each frame is decoded
    #[default]
    Now,
    /// A fixed calendar date
    Date(DateTime<Utc>),
    /// A fixed 32-bit time tag
    Timetag(u32),
    /// The most recent 32-bit time tag seen in the stream for the same `msgSubtype`
    Stream,
}

impl Basedate {
    /// The basedate in time tag seconds, or `None` when the stream has not yet
    /// carried a full time tag for `msg_subtype`
    pub fn seconds(&self, msg_subtype: u8, timetags: &Timetags) -> Option<i64> {
        match self {
            Basedate::Now => Some(date_to_timetag(Utc::now())),
            Basedate::Date(date) => Some(date_to_timetag(*date)),
            Basedate::Timetag(tag) => Some(i64::from(*tag)),
            Basedate::Stream => timetags.get(msg_subtype).map(i64::from),
        }
    }
}

impl From<DateTime<Utc>> for Basedate {
    fn from(date: DateTime<Utc>) -> Self {
        Basedate::Date(date)
    }
}

impl From<u32> for Basedate {
    fn from(timetag: u32) -> Self {
        Basedate::Timetag(timetag)
    }
}

/// Latest 32-bit time tag observed per `msgSubtype`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetags(HashMap<u8, u32>);

impl Timetags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, msg_subtype: u8) -> Option<u32> {
        self.0.get(&msg_subtype).copied()
    }

    pub(crate) fn observe(&mut self, msg_subtype: u8, timetag: u32) {
        self.0.insert(msg_subtype, timetag);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(u8, u32)> for Timetags {
    fn from_iter<T: IntoIterator<Item = (u8, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
