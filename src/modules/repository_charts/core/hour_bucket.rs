use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::modules::repository_charts::core::username::Username;

const BUCKET_FORMAT: &str = "%Y%m%d%H";

/// An instant truncated to the start of its hour (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourBucket(DateTime<Utc>);

impl HourBucket {
    pub fn containing(instant: DateTime<Utc>) -> Self {
        let truncated = instant
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(instant);
        Self(truncated)
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BUCKET_FORMAT))
    }
}

impl FromStr for HourBucket {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono refuses to parse a datetime without minutes
        let naive = NaiveDateTime::parse_from_str(&format!("{s}00"), "%Y%m%d%H%M")?;
        Ok(Self(Utc.from_utc_datetime(&naive)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    username: String,
    bucket: HourBucket,
}

impl CacheKey {
    pub fn new(username: &Username, bucket: HourBucket) -> Self {
        Self {
            username: username.cache_key(),
            bucket,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn bucket(&self) -> HourBucket {
        self.bucket
    }

    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.username, self.bucket)
    }

    /// Inverse of [`CacheKey::file_stem`]. Logins never contain `_`.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        let (username, bucket) = stem.rsplit_once('_')?;
        let username = Username::parse(username).ok()?;
        let bucket = bucket.parse().ok()?;
        Some(Self::new(&username, bucket))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}
