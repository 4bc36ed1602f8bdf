// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod ranking;
pub mod validation;
pub mod view_state;

pub use distance::{haversine_distance, calculate_distance, calculate_bounding_box, is_within_bounding_box, DistanceError, DistanceUnit};
pub use filters::{filter_by_tag, filter_within_radius};
pub use ranking::{sort_happenings, describe_distance, Comparator, SortMode};
pub use validation::InputKind;
pub use view_state::{Action, Effect, FetchRequest, LoadState, ViewState};
