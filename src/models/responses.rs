use crate::core::distance::DistanceUnit;
use crate::core::ranking::{describe_distance, distance_from_location, SortMode};
use crate::core::view_state::LoadState;
use crate::models::domain::{CityRecord, Happening, Location};
use serde::{Deserialize, Serialize};

/// A happening with its distance from the reference location, when known
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedHappening {
    #[serde(flatten)]
    pub happening: Happening,
    pub distance: Option<f64>,
    #[serde(rename = "distanceText")]
    pub distance_text: Option<String>,
}

impl RankedHappening {
    pub fn new(happening: Happening, reference: &Location, unit: DistanceUnit) -> Self {
        let distance = distance_from_location(&happening, reference, unit).ok();
        Self {
            happening,
            distance,
            distance_text: distance.map(|d| describe_distance(d, unit)),
        }
    }
}

/// Response for listing and ranking endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HappeningsResponse {
    pub status: ListStatus,
    pub sort: SortMode,
    pub unit: DistanceUnit,
    pub happenings: Vec<RankedHappening>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Pending,
    Empty,
    Available,
}

impl From<LoadState> for ListStatus {
    fn from(value: LoadState) -> Self {
        match value {
            LoadState::Idle | LoadState::Pending => ListStatus::Pending,
            LoadState::Empty => ListStatus::Empty,
            LoadState::Available => ListStatus::Available,
        }
    }
}

/// Response for the distance endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub distance: f64,
    pub unit: DistanceUnit,
}

/// City autocomplete entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub label: String,
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    #[serde(rename = "admin1Code")]
    pub admin1_code: Option<String>,
    pub timezone: Option<String>,
}

impl From<CityRecord> for CitySuggestion {
    fn from(raw: CityRecord) -> Self {
        let suffix = if raw.country_code == "US" {
            raw.admin1_code.clone().unwrap_or_default()
        } else {
            raw.country_code.clone()
        };
        let id = match &raw.geoname_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        Self {
            label: format!("{}, {}", raw.name, suffix),
            id,
            latitude: raw.loc.coordinates[1],
            longitude: raw.loc.coordinates[0],
            country: raw.country_code,
            admin1_code: raw.admin1_code,
            timezone: raw.timezone,
        }
    }
}

impl CitySuggestion {
    /// Reference location for the selected city
    pub fn to_location(&self) -> Location {
        Location {
            latitude: Some(self.latitude),
            longitude: Some(self.longitude),
            city: Some(self.label.clone()),
            country: Some(self.country.clone()),
            admin1_code: self.admin1_code.clone(),
            city_id: Some(self.id.clone()),
            timezone: self.timezone.clone(),
        }
    }
}

/// Tag autocomplete entry; `id` is `None` for the "anything" choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSuggestion {
    pub label: String,
    pub id: Option<String>,
}

/// Label of the suggestion that clears the tag filter
pub const ANY_TAG_LABEL: &str = "anything";

/// Short result lists also offer "anything"
const ANY_TAG_THRESHOLD: usize = 7;

pub fn tag_suggestions(tags: Vec<String>) -> Vec<TagSuggestion> {
    let offer_any = tags.len() <= ANY_TAG_THRESHOLD;
    let mut suggestions: Vec<TagSuggestion> = tags
        .into_iter()
        .map(|tag| TagSuggestion {
            label: tag.clone(),
            id: Some(tag),
        })
        .collect();

    if offer_any {
        suggestions.push(TagSuggestion {
            label: ANY_TAG_LABEL.to_string(),
            id: None,
        });
    }
    suggestions
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
