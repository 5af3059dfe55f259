//! Clinical timestamps read from resource date-time elements.
//!
//! Parsed values render back in the form they were read: offsets and
//! fractional seconds survive, a bare date renders as local midnight.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// A parsed clinical timestamp.
///
/// Synthea writes `onsetDateTime` and friends with an offset
/// (`2011-06-27T01:12:54-04:00`), but hand-written Bundles often carry a bare
/// date or a local date-time. Both are accepted; a bare date becomes midnight
/// local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClinicalDateTime {
    /// Date-time with a UTC offset.
    Zoned(OffsetDateTime),
    /// Date-time without offset information.
    Local(PrimitiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse FHIR DateTime '{value}'")]
pub struct InvalidDateTime {
    pub value: String,
}

impl FromStr for ClinicalDateTime {
    type Err = InvalidDateTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidDateTime {
            value: s.to_string(),
        };

        if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
            return Ok(Self::Zoned(dt));
        }

        let local = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        let local_fraction =
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
        if let Ok(dt) = PrimitiveDateTime::parse(s, local)
            .or_else(|_| PrimitiveDateTime::parse(s, local_fraction))
        {
            return Ok(Self::Local(dt));
        }

        let date = Date::parse(s, &format_description!("[year]-[month]-[day]"))
            .map_err(|_| invalid())?;
        Ok(Self::Local(PrimitiveDateTime::new(date, Time::MIDNIGHT)))
    }
}

impl fmt::Display for ClinicalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = match self {
            Self::Zoned(dt) => dt.format(&Rfc3339),
            Self::Local(dt) if dt.nanosecond() != 0 => dt.format(&format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"
            )),
            Self::Local(dt) => {
                dt.format(&format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
            }
        }
        .map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl Serialize for ClinicalDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
