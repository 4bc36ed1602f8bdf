//! Happening Rank - distance and ranking service for Happening event listings
//!
//! This library provides great-circle distance calculation, the comparators
//! used to order happenings by distance or date, and the view state that ties
//! ranking to fetching from the Happening backend.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    calculate_distance, haversine_distance, sort_happenings, Action, Comparator, DistanceError,
    DistanceUnit, SortMode, ViewState,
};
pub use models::{Coordinate, Happening, HappeningQuery, Location, TagId};
pub use services::{BackendClient, HappeningSource, Session};
