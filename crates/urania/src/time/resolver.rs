use crate::error::TemporalError;
use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Caller's daylight-saving preference for a local wall-clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPreference {
    /// Resolve automatically; ambiguous readings are rejected.
    #[default]
    Auto,
    /// `true` selects the DST offset, `false` the standard offset.
    Explicit(bool),
}

impl Serialize for DstPreference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DstPreference::Auto => serializer.serialize_str("auto"),
            DstPreference::Explicit(flag) => serializer.serialize_bool(*flag),
        }
    }
}

impl<'de> Deserialize<'de> for DstPreference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Ok(DstPreference::Explicit(flag)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl FromStr for DstPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(DstPreference::Auto),
            "true" | "dst" => Ok(DstPreference::Explicit(true)),
            "false" | "standard" => Ok(DstPreference::Explicit(false)),
            other => Err(format!("Invalid daylight-saving preference: {other} (expected auto, true or false)")),
        }
    }
}

/// Distinct UTC offsets a zone observes during one calendar year.
///
/// Offsets are seconds east of UTC. The smallest observed offset is taken as
/// standard time and the largest as daylight time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetProfile {
    pub timezone: String,
    pub year: i32,
    pub offsets: Vec<i32>,
    pub standard_offset: i32,
    pub dst_offset: i32,
    pub has_dst: bool,
}

impl OffsetProfile {
    /// Sample the zone at 00:00 and 12:00 UTC on every day of `year`.
    pub fn compute(tz: Tz, year: i32) -> Self {
        let mut offsets = Vec::new();
        if let Some(start) = NaiveDate::from_ymd_opt(year, 1, 1) {
            for day in start.iter_days().take_while(|d| d.year() == year) {
                for hour in [0, 12] {
                    if let Some(at) = day.and_hms_opt(hour, 0, 0) {
                        offsets.push(offset_at_utc(tz, at));
                    }
                }
            }
        }
        offsets.sort_unstable();
        offsets.dedup();

        let standard_offset = offsets.first().copied().unwrap_or(0);
        let dst_offset = offsets.last().copied().unwrap_or(0);

        Self {
            timezone: tz.name().to_string(),
            year,
            has_dst: offsets.len() > 1,
            offsets,
            standard_offset,
            dst_offset,
        }
    }

    pub fn is_dst_offset(&self, offset: i32) -> bool {
        self.has_dst && offset == self.dst_offset
    }
}

/// A local wall-clock reading resolved to a single UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedInstant {
    pub utc: DateTime<Utc>,
    pub local: NaiveDateTime,
    /// Seconds east of UTC.
    pub offset_seconds: i32,
    pub daylight_saving: bool,
}

impl ResolvedInstant {
    /// UTC minus local time, in minutes (New York in winter is +300).
    pub fn offset_minutes(&self) -> i32 {
        -self.offset_seconds / 60
    }
}

/// Converts local readings in IANA zones to UTC instants.
///
/// Owns a memoization cache of [`OffsetProfile`]s keyed by (zone, year); the
/// cache only stores pure functions of the timezone database.
#[derive(Debug, Default)]
pub struct TimeResolver {
    profiles: RwLock<HashMap<(String, i32), Arc<OffsetProfile>>>,
}

impl TimeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached offset profile for (zone, year).
    pub fn profile(&self, tz: Tz, year: i32) -> Arc<OffsetProfile> {
        let key = (tz.name().to_string(), year);
        if let Ok(cache) = self.profiles.read() {
            if let Some(profile) = cache.get(&key) {
                return Arc::clone(profile);
            }
        }

        let profile = Arc::new(OffsetProfile::compute(tz, year));
        log::debug!(
            "Offset profile for {} {}: {:?} (dst: {})",
            profile.timezone,
            year,
            profile.offsets,
            profile.has_dst
        );

        match self.profiles.write() {
            Ok(mut cache) => Arc::clone(cache.entry(key).or_insert(profile)),
            Err(_) => profile,
        }
    }

    /// Resolve a local date and time in `tz` to UTC.
    pub fn resolve(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        tz: Tz,
        preference: DstPreference,
    ) -> Result<ResolvedInstant, TemporalError> {
        let local = date.and_time(time);
        let profile = self.profile(tz, date.year());

        let mut offsets = profile.offsets.clone();
        offsets.push(offset_at_utc(tz, local));
        offsets.sort_unstable();
        offsets.dedup();

        // Keep only offsets whose UTC instant projects back onto the same reading.
        let mut candidates: Vec<(DateTime<Utc>, i32)> = offsets
            .iter()
            .filter_map(|&offset| {
                let utc = local - Duration::seconds(i64::from(offset));
                let projected = tz.from_utc_datetime(&utc).naive_local();
                (projected == local).then(|| (Utc.from_utc_datetime(&utc), offset))
            })
            .collect();
        candidates.sort_by_key(|(utc, _)| *utc);
        candidates.dedup_by_key(|(utc, _)| *utc);

        let (utc, offset) = match (candidates.len(), preference) {
            (0, _) => {
                return Err(TemporalError::NonexistentLocalTime {
                    local,
                    timezone: tz.name().to_string(),
                })
            }
            (1, DstPreference::Auto) => candidates[0],
            (n, DstPreference::Auto) => {
                return Err(TemporalError::AmbiguousLocalTime {
                    local,
                    timezone: tz.name().to_string(),
                    candidates: n,
                })
            }
            (_, DstPreference::Explicit(want_dst)) => {
                let wanted = if want_dst {
                    profile.dst_offset
                } else {
                    profile.standard_offset
                };
                let exact = candidates
                    .iter()
                    .find(|(_, offset)| profile.has_dst && *offset == wanted)
                    .copied();
                match exact {
                    Some(candidate) => candidate,
                    None => natural_candidate(tz, &candidates),
                }
            }
        };

        Ok(ResolvedInstant {
            utc,
            local,
            offset_seconds: offset,
            daylight_saving: profile.is_dst_offset(offset),
        })
    }

    /// Local reading of a UTC instant in `tz`, with the offset and DST flag in force.
    pub fn localize(&self, utc: DateTime<Utc>, tz: Tz) -> ResolvedInstant {
        let zoned = utc.with_timezone(&tz);
        let local = zoned.naive_local();
        let offset = zoned.offset().fix().local_minus_utc();
        let profile = self.profile(tz, local.year());

        ResolvedInstant {
            utc,
            local,
            offset_seconds: offset,
            daylight_saving: profile.is_dst_offset(offset),
        }
    }
}

/// Offset in force in `tz` at a naive UTC reading, in seconds east.
fn offset_at_utc(tz: Tz, utc: NaiveDateTime) -> i32 {
    tz.offset_from_utc_datetime(&utc).fix().local_minus_utc()
}

/// First candidate whose offset is the zone's own offset at that instant.
fn natural_candidate(tz: Tz, candidates: &[(DateTime<Utc>, i32)]) -> (DateTime<Utc>, i32) {
    candidates
        .iter()
        .find(|(utc, offset)| offset_at_utc(tz, utc.naive_utc()) == *offset)
        .copied()
        .unwrap_or(candidates[0])
}

/// Parse an IANA zone name.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}
