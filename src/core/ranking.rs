use crate::core::distance::{calculate_distance, DistanceError, DistanceUnit};
use crate::models::{Happening, Location};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Which ordering the happening list is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    #[serde(alias = "distance")]
    DistanceFromLocation,
    #[serde(alias = "date")]
    TimeFromDate,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distanceFromLocation" | "distance" => Ok(Self::DistanceFromLocation),
            "timeFromDate" | "date" => Ok(Self::TimeFromDate),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

/// Maps a happening to the key it is ordered by
#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    /// Distance between the happening and `location`
    DistanceFromLocation {
        location: Location,
        unit: DistanceUnit,
    },
    /// Signed milliseconds from `date` to the happening's begin instant
    TimeFromDate(DateTime<Utc>),
}

impl Comparator {
    pub fn mode(&self) -> SortMode {
        match self {
            Self::DistanceFromLocation { .. } => SortMode::DistanceFromLocation,
            Self::TimeFromDate(_) => SortMode::TimeFromDate,
        }
    }

    /// Ordering key, `None` when it cannot be computed
    ///
    /// A distance key is missing while the reference location (or the
    /// happening's own location) is unset.
    pub fn key(&self, happening: &Happening) -> Option<f64> {
        match self {
            Self::DistanceFromLocation { location, unit } => {
                distance_from_location(happening, location, *unit).ok()
            }
            Self::TimeFromDate(date) => Some(time_from_date(happening, *date) as f64),
        }
    }

    /// Compare two happenings; missing keys sort last and tie with each other
    pub fn compare(&self, a: &Happening, b: &Happening) -> Ordering {
        compare_keys(self.key(a), self.key(b))
    }
}

/// Distance from a happening to a location
pub fn distance_from_location(
    happening: &Happening,
    location: &Location,
    unit: DistanceUnit,
) -> Result<f64, DistanceError> {
    calculate_distance(
        location.latitude,
        location.longitude,
        happening.location.latitude,
        happening.location.longitude,
        unit,
    )
}

/// Milliseconds from `date` until the happening begins; negative if it began earlier
pub fn time_from_date(happening: &Happening, date: DateTime<Utc>) -> i64 {
    (happening.begins_at() - date).num_milliseconds()
}

fn compare_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of happenings by the comparator's key
///
/// Keys are computed once per element; equal keys keep their relative order.
pub fn sort_happenings(happenings: &mut Vec<Happening>, comparator: &Comparator) {
    let mut keyed: Vec<(Option<f64>, Happening)> = happenings
        .drain(..)
        .map(|h| (comparator.key(&h), h))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(*a, *b));

    happenings.extend(keyed.into_iter().map(|(_, h)| h));
}

/// Human readable distance: whole units, or one decimal when under one unit
pub fn describe_distance(distance: f64, unit: DistanceUnit) -> String {
    let whole = distance.floor();
    if whole >= 1.0 {
        format!("{} {} away", whole as u64, unit.label())
    } else {
        format!("{:.1} {} away", distance, unit.label())
    }
}
