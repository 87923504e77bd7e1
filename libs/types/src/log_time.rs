//! Log time variants and their interpretation as UTC instants.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// When the secure element produced a record
///
/// The variant mirrors the ASN.1 CHOICE in the record: an INTEGER of Unix
/// seconds, a UTCTime string or a GeneralizedTime string. The strings are
/// kept exactly as encoded so the DTBS can be rebuilt byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogTime {
    UnixTime(i64),
    UtcTime(String),
    GeneralizedTime(String),
}

impl LogTime {
    /// Interpret the log time as a UTC instant
    ///
    /// Returns `None` for strings that are not valid DER time encodings.
    /// UTCTime years below 50 fall into the 21st century (RFC 5280 rule).
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            LogTime::UnixTime(secs) => DateTime::<Utc>::from_timestamp(*secs, 0),
            LogTime::UtcTime(text) => {
                let body = text.strip_suffix('Z')?;
                let yy: u32 = body.get(..2)?.parse().ok()?;
                let century = if yy < 50 { "20" } else { "19" };
                let full = format!("{}{}", century, body);
                NaiveDateTime::parse_from_str(&full, "%Y%m%d%H%M%S")
                    .ok()
                    .map(|naive| naive.and_utc())
            }
            LogTime::GeneralizedTime(text) => {
                let body = text.strip_suffix('Z')?;
                NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }
        }
    }

    /// Short label used in log file names
    pub fn file_name_prefix(&self) -> &'static str {
        match self {
            LogTime::UnixTime(_) => "Unixt",
            LogTime::UtcTime(_) => "UTCTime",
            LogTime::GeneralizedTime(_) => "Gent",
        }
    }
}

impl fmt::Display for LogTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTime::UnixTime(secs) => write!(f, "{}", secs),
            LogTime::UtcTime(text) | LogTime::GeneralizedTime(text) => f.write_str(text),
        }
    }
}
