use crate::core::distance::{calculate_bounding_box, is_within_bounding_box, DistanceUnit};
use crate::models::{Coordinate, Happening, TagId};

/// Keep happenings carrying `tag`; with no tag every happening is kept
pub fn filter_by_tag(happenings: Vec<Happening>, tag: Option<&TagId>) -> Vec<Happening> {
    match tag {
        Some(tag) => happenings.into_iter().filter(|h| h.has_tag(tag)).collect(),
        None => happenings,
    }
}

/// Keep happenings within `radius` of `center`
///
/// Stage 1 is a bounding box pre-filter, stage 2 the exact haversine check.
/// Happenings without coordinates are dropped.
pub fn filter_within_radius(
    happenings: Vec<Happening>,
    center: Coordinate,
    radius: f64,
    unit: DistanceUnit,
) -> Vec<Happening> {
    let bbox = calculate_bounding_box(center, radius, unit);

    happenings
        .into_iter()
        .filter(|h| match h.location.coordinate() {
            Some(point) => {
                is_within_bounding_box(point, &bbox) && center.distance_to(&point, unit) <= radius
            }
            None => false,
        })
        .collect()
}
