use crate::core::distance::DistanceUnit;
use crate::core::ranking::SortMode;
use crate::core::validation::InputKind;
use crate::models::domain::{Coordinate, Happening, Location, TagId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Filters for a happenings fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HappeningQuery {
    pub tag: Option<TagId>,
    pub near: Option<Coordinate>,
}

impl HappeningQuery {
    /// Backend query string parameters, in the order the backend expects
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(tag) = &self.tag {
            pairs.push(("tags", tag.to_string()));
        }
        if let Some(near) = &self.near {
            pairs.push(("latitude", near.latitude.to_string()));
            pairs.push(("longitude", near.longitude.to_string()));
        }
        pairs
    }
}

/// Query string of `GET /happenings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HappeningsParams {
    pub tags: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub sort: Option<SortMode>,
    pub unit: Option<DistanceUnit>,
    pub date: Option<DateTime<Utc>>,
}

impl HappeningsParams {
    pub fn query(&self) -> HappeningQuery {
        HappeningQuery {
            tag: self.tags.as_deref().filter(|t| !t.is_empty()).map(TagId::from),
            near: self.reference_location().coordinate(),
        }
    }

    pub fn reference_location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            ..Location::default()
        }
    }
}

/// Query string of `GET /distance`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistanceParams {
    pub lat1: Option<f64>,
    pub lon1: Option<f64>,
    pub lat2: Option<f64>,
    pub lon2: Option<f64>,
    pub unit: Option<DistanceUnit>,
}

/// Autocomplete query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub searchstring: String,
}

/// Rank a caller-supplied list of happenings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRequest {
    pub happenings: Vec<Happening>,
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unit: Option<DistanceUnit>,
    /// Only rank happenings carrying this tag
    #[serde(default)]
    pub tag: Option<TagId>,
}

/// A new or edited happening, as entered in the submission form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HappeningSubmission {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = "validate_number"))]
    #[serde(rename = "cityid", alias = "cityId")]
    pub city_id: String,
    #[validate(custom(function = "validate_date"))]
    #[serde(rename = "begindate", alias = "beginDate")]
    pub begin_date: String,
    #[validate(custom(function = "validate_date"))]
    #[serde(rename = "enddate", alias = "endDate")]
    pub end_date: String,
    #[validate(custom(function = "validate_url"))]
    #[serde(rename = "websiteurl", alias = "websiteUrl")]
    pub website_url: String,
    #[validate(length(min = 1))]
    pub tags: Vec<String>,
}

impl HappeningSubmission {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("cityid", self.city_id.clone()),
            ("begindate", self.begin_date.clone()),
            ("enddate", self.end_date.clone()),
            ("websiteurl", self.website_url.clone()),
            ("tags", self.tags.join(",")),
        ]
    }
}

/// A new tag
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagSubmission {
    #[validate(length(min = 1))]
    pub name: String,
}

fn validate_number(value: &str) -> Result<(), ValidationError> {
    check(InputKind::Number, value, "number")
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    check(InputKind::Date, value, "date")
}

fn validate_url(value: &str) -> Result<(), ValidationError> {
    check(InputKind::Url, value, "url")
}

fn check(kind: InputKind, value: &str, code: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() || !kind.is_valid(value) {
        return Err(ValidationError::new(code));
    }
    Ok(())
}
