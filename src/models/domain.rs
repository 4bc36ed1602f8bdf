use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components lie within their valid degree ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A place, possibly without a known coordinate
///
/// Latitude and longitude are `None` while the place is unresolved. That is
/// distinct from `Some(0.0)`, which is a legitimate position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(alias = "cityName", default)]
    pub city: Option<String>,
    #[serde(alias = "countryCode", default)]
    pub country: Option<String>,
    #[serde(rename = "admin1Code", default, skip_serializing_if = "Option::is_none")]
    pub admin1_code: Option<String>,
    #[serde(rename = "cityId", default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Location {
    /// A location with only a coordinate
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    /// Whether both latitude and longitude are present
    pub fn is_defined(&self) -> bool {
        self.coordinate().is_some()
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    /// "City, Country" when both parts are known
    pub fn display_name(&self) -> Option<String> {
        match (&self.city, &self.country) {
            (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
            (Some(city), None) => Some(city.clone()),
            _ => None,
        }
    }
}

impl From<Coordinate> for Location {
    fn from(value: Coordinate) -> Self {
        Self::at(value.latitude, value.longitude)
    }
}

/// Tag identifier
///
/// Older listings used numeric theme ids, newer ones use tag names. Both are
/// held as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl TagId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for TagId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawTag {
            Text(String),
            Number(i64),
        }

        Ok(match RawTag::deserialize(deserializer)? {
            RawTag::Text(text) => TagId(text),
            RawTag::Number(n) => TagId(n.to_string()),
        })
    }
}

/// Begin and end instants of a happening
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HappeningDates {
    #[serde(rename = "beginDate", deserialize_with = "flexible_date")]
    pub begin_date: DateTime<Utc>,
    #[serde(rename = "endDate", deserialize_with = "flexible_date")]
    pub end_date: DateTime<Utc>,
}

/// A single listed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Happening {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        deserialize_with = "optional_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    pub dates: HappeningDates,
    pub location: Location,
    #[serde(alias = "themes", default)]
    pub tags: Vec<TagId>,
    #[serde(rename = "websiteUrl", default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl Happening {
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.contains(tag)
    }

    pub fn begins_at(&self) -> DateTime<Utc> {
        self.dates.begin_date
    }
}

/// Backend ids are strings, legacy listings used integers
fn optional_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TagId>::deserialize(deserializer)?.map(|id| id.0))
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC)
fn flexible_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flexible_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid date: {}", raw))
    })
}

pub fn parse_flexible_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Raw city record as returned by the backend's city search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    #[serde(rename = "admin1Code", default)]
    pub admin1_code: Option<String>,
    #[serde(rename = "geonameID", alias = "geonameId")]
    pub geoname_id: serde_json::Value,
    pub loc: GeoJsonPoint,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// GeoJSON point, coordinates are `[longitude, latitude]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    pub coordinates: [f64; 2],
}
