// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Happening, HappeningDates, Location, Coordinate, TagId, BoundingBox, CityRecord, GeoJsonPoint, parse_flexible_date};
pub use requests::{HappeningQuery, HappeningsParams, DistanceParams, SearchParams, RankRequest, HappeningSubmission, TagSubmission};
pub use responses::{RankedHappening, HappeningsResponse, ListStatus, DistanceResponse, CitySuggestion, TagSuggestion, tag_suggestions, HealthResponse, ErrorResponse};
