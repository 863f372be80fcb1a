//! Speed restriction grouping.

use std::fmt;

use log::debug;

use crate::{Direction, SpeedRow, Tags};

/// Travel directions a speed limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Positive,
    Negative,
    Both,
}

impl Validity {
    /// Tag key carrying a limit with this validity.
    #[must_use]
    pub const fn tag_key(self) -> &'static str {
        match self {
            Self::Positive => "maxspeed:forward",
            Self::Negative => "maxspeed:backward",
            Self::Both => "maxspeed",
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Both => "both",
        })
    }
}

/// Resolved speed limit of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedRestriction {
    pub segment: i64,
    /// Limit in km/h.
    pub speed: i64,
    pub validity: Validity,
}

pub(super) fn restrictions(rows: &[&SpeedRow]) -> Vec<SpeedRestriction> {
    rows.iter()
        .map(|row| SpeedRestriction {
            segment: row.segment,
            speed: row.speed,
            validity: match row.direction {
                Direction::Positive => Validity::Positive,
                Direction::Negative => Validity::Negative,
                Direction::Unspecified => Validity::Both,
            },
        })
        .collect()
}

/// First restriction per validity wins.
pub(super) fn speed_tags(restrictions: &[SpeedRestriction]) -> Tags {
    let mut tags = Tags::new();
    for restriction in restrictions {
        let key = restriction.validity.tag_key();
        if let Some(existing) = tags.get(key) {
            debug!(
                "segment {}: ignoring {} km/h {}, already {existing}",
                restriction.segment, restriction.speed, restriction.validity
            );
            continue;
        }
        tags.insert(key.to_owned(), restriction.speed.to_string());
    }
    tags
}
