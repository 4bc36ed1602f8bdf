// Unit tests for happening ranking

use chrono::{TimeZone, Utc};
use happening_rank::core::{
    calculate_bounding_box, calculate_distance, describe_distance, filter_by_tag,
    filter_within_radius, haversine_distance, is_within_bounding_box, sort_happenings,
    Comparator, DistanceError, DistanceUnit, InputKind,
};
use happening_rank::models::{Coordinate, Happening, HappeningDates, Location, TagId};

const NYC: (f64, f64) = (40.75, -73.997);
const BOSTON: (f64, f64) = (42.3583, -71.0603);

fn create_happening(name: &str, lat: f64, lon: f64, begin_day: u32, tags: &[&str]) -> Happening {
    let begin = Utc.with_ymd_and_hms(2013, 5, begin_day, 18, 0, 0).unwrap();
    Happening {
        id: None,
        name: name.to_string(),
        dates: HappeningDates {
            begin_date: begin,
            end_date: begin,
        },
        location: Location::at(lat, lon),
        tags: tags.iter().map(|t| TagId::new(*t)).collect(),
        website_url: None,
    }
}

fn names(happenings: &[Happening]) -> Vec<&str> {
    happenings.iter().map(|h| h.name.as_str()).collect()
}

fn within_one_percent(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= expected * 0.01
}

#[test]
fn test_distance_same_point_is_zero() {
    let d = calculate_distance(Some(NYC.0), Some(NYC.1), Some(NYC.0), Some(NYC.1), DistanceUnit::Miles)
        .unwrap();
    assert_eq!(d, 0.0);
}

#[test]
fn test_distance_all_zero_is_zero() {
    // 0.0 is a valid coordinate, not a missing one
    let d = calculate_distance(Some(0.0), Some(0.0), Some(0.0), Some(0.0), DistanceUnit::Kilometers);
    assert_eq!(d, Ok(0.0));
}

#[test]
fn test_distance_nyc_to_boston() {
    let km = haversine_distance(NYC.0, NYC.1, BOSTON.0, BOSTON.1, DistanceUnit::Kilometers);
    let miles = haversine_distance(NYC.0, NYC.1, BOSTON.0, BOSTON.1, DistanceUnit::Miles);

    assert!(within_one_percent(km, 306.0), "got {} km", km);
    assert!(within_one_percent(miles, 190.0), "got {} miles", miles);
}

#[test]
fn test_distance_is_symmetric() {
    let there = haversine_distance(NYC.0, NYC.1, BOSTON.0, BOSTON.1, DistanceUnit::Kilometers);
    let back = haversine_distance(BOSTON.0, BOSTON.1, NYC.0, NYC.1, DistanceUnit::Kilometers);
    assert!((there - back).abs() < 1e-9);
}

#[test]
fn test_distance_missing_argument() {
    let err = calculate_distance(Some(1.0), Some(2.0), Some(3.0), None, DistanceUnit::Miles).unwrap_err();
    assert!(matches!(err, DistanceError::InvalidArgument(_)));

    let err = calculate_distance(None, Some(2.0), Some(3.0), Some(4.0), DistanceUnit::Miles).unwrap_err();
    assert_eq!(err, DistanceError::InvalidArgument("lat1"));
}

#[test]
fn test_distance_rejects_nan() {
    let result = calculate_distance(Some(f64::NAN), Some(0.0), Some(0.0), Some(0.0), DistanceUnit::Miles);
    assert!(result.is_err());
}

#[test]
fn test_bounding_box_contains_center() {
    let center = Coordinate::new(NYC.0, NYC.1);
    let bbox = calculate_bounding_box(center, 25.0, DistanceUnit::Miles);

    assert!(bbox.min_lat < NYC.0 && bbox.max_lat > NYC.0);
    assert!(bbox.min_lon < NYC.1 && bbox.max_lon > NYC.1);
    assert!(is_within_bounding_box(center, &bbox));
    assert!(!is_within_bounding_box(Coordinate::new(BOSTON.0, BOSTON.1), &bbox));
}

#[test]
fn test_sort_by_distance_nearest_first() {
    let mut happenings = vec![
        create_happening("boston", BOSTON.0, BOSTON.1, 3, &[]),
        create_happening("brooklyn", 40.6782, -73.9442, 2, &[]),
        create_happening("midtown", 40.7580, -73.9855, 1, &[]),
    ];
    let comparator = Comparator::DistanceFromLocation {
        location: Location::at(NYC.0, NYC.1),
        unit: DistanceUnit::Miles,
    };

    sort_happenings(&mut happenings, &comparator);

    assert_eq!(names(&happenings), vec!["midtown", "brooklyn", "boston"]);
}

#[test]
fn test_sort_by_distance_is_stable() {
    // Same venue, so equal distances; input order must survive
    let mut happenings = vec![
        create_happening("first", BOSTON.0, BOSTON.1, 9, &[]),
        create_happening("second", BOSTON.0, BOSTON.1, 1, &[]),
        create_happening("third", BOSTON.0, BOSTON.1, 5, &[]),
    ];
    let comparator = Comparator::DistanceFromLocation {
        location: Location::at(NYC.0, NYC.1),
        unit: DistanceUnit::Kilometers,
    };

    sort_happenings(&mut happenings, &comparator);

    assert_eq!(names(&happenings), vec!["first", "second", "third"]);
}

#[test]
fn test_sort_by_time_from_date() {
    let mut happenings = vec![
        create_happening("late", 0.0, 0.0, 20, &[]),
        create_happening("past", 0.0, 0.0, 1, &[]),
        create_happening("soon", 0.0, 0.0, 12, &[]),
    ];
    let reference = Utc.with_ymd_and_hms(2013, 5, 10, 0, 0, 0).unwrap();

    sort_happenings(&mut happenings, &Comparator::TimeFromDate(reference));

    // Signed offsets: already-begun happenings come first
    assert_eq!(names(&happenings), vec!["past", "soon", "late"]);
}

#[test]
fn test_sort_by_distance_without_reference_keeps_order() {
    let mut happenings = vec![
        create_happening("b", BOSTON.0, BOSTON.1, 1, &[]),
        create_happening("a", NYC.0, NYC.1, 1, &[]),
    ];
    let comparator = Comparator::DistanceFromLocation {
        location: Location::default(),
        unit: DistanceUnit::Miles,
    };

    sort_happenings(&mut happenings, &comparator);

    assert_eq!(names(&happenings), vec!["b", "a"]);
}

#[test]
fn test_filter_by_tag() {
    let happenings = vec![
        create_happening("chess", 0.0, 0.0, 1, &["games"]),
        create_happening("jazz", 0.0, 0.0, 1, &["music"]),
    ];

    let games = filter_by_tag(happenings.clone(), Some(&TagId::new("games")));
    assert_eq!(names(&games), vec!["chess"]);

    let all = filter_by_tag(happenings, None);
    assert_eq!(all.len(), 2);
}

#[test]
fn test_filter_within_radius() {
    let happenings = vec![
        create_happening("boston", BOSTON.0, BOSTON.1, 1, &[]),
        create_happening("midtown", 40.7580, -73.9855, 1, &[]),
    ];

    let nearby = filter_within_radius(happenings, Coordinate::new(NYC.0, NYC.1), 10.0, DistanceUnit::Miles);

    assert_eq!(names(&nearby), vec!["midtown"]);
}

#[test]
fn test_describe_distance() {
    assert_eq!(describe_distance(190.4, DistanceUnit::Miles), "190 miles away");
    assert_eq!(describe_distance(0.42, DistanceUnit::Kilometers), "0.4 km away");
}

#[test]
fn test_input_kinds() {
    assert!(InputKind::Number.is_valid("5128581"));
    assert!(!InputKind::Number.is_valid("abc"));
    assert!(InputKind::Date.is_valid("2013-05-01"));
    assert!(InputKind::ObjectId.is_valid("51a4f1e2b5c4d3e2f1a0b9c8"));
    assert!(!InputKind::ObjectId.is_valid("51a4"));
    assert!(InputKind::Url.is_valid("example.com"));
}
