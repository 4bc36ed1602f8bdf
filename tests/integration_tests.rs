// Integration tests for happening ranking

use chrono::{TimeZone, Utc};
use happening_rank::core::{Action, DistanceUnit, LoadState, SortMode};
use happening_rank::models::{
    Happening, HappeningDates, HappeningQuery, HappeningSubmission, Location, TagId,
};
use happening_rank::services::{BackendClient, BackendError, HappeningSource, Session};
use mockito::Matcher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn client(url: &str) -> BackendClient {
    BackendClient::new(url, Duration::from_secs(5)).unwrap()
}

fn create_happening(name: &str, lat: f64, lon: f64, begin_day: u32) -> Happening {
    let begin = Utc.with_ymd_and_hms(2013, 5, begin_day, 0, 0, 0).unwrap();
    Happening {
        id: None,
        name: name.to_string(),
        dates: HappeningDates {
            begin_date: begin,
            end_date: begin,
        },
        location: Location::at(lat, lon),
        tags: vec![],
        website_url: None,
    }
}

/// Serves a fixed list and counts how often it was asked
struct CountingSource {
    calls: AtomicUsize,
    happenings: Vec<Happening>,
}

impl CountingSource {
    fn new(happenings: Vec<Happening>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            happenings,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HappeningSource for CountingSource {
    async fn fetch_happenings(&self, query: &HappeningQuery) -> Result<Vec<Happening>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let happenings = match &query.tag {
            Some(tag) => self.happenings.iter().filter(|h| h.has_tag(tag)).cloned().collect(),
            None => self.happenings.clone(),
        };
        Ok(happenings)
    }
}

#[tokio::test]
async fn test_search_cities_builds_labels() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/cities/search")
        .match_query(Matcher::UrlEncoded("searchstring".into(), "Chicago".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"name": "Chicago", "countryCode": "US", "admin1Code": "IL",
                 "geonameID": 4887398, "loc": {"type": "Point", "coordinates": [-87.65005, 41.85003]},
                 "timezone": "America/Chicago"},
                {"name": "Chicago Ridge", "countryCode": "CA", "geonameID": "1",
                 "loc": {"type": "Point", "coordinates": [-80.0, 45.0]}}
            ]"#,
        )
        .create_async()
        .await;

    let cities = client(&server.url()).search_cities("Chicago, IL").await.unwrap();

    mock.assert_async().await;
    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].label, "Chicago, IL");
    assert_eq!(cities[0].id, "4887398");
    assert!((cities[0].latitude - 41.85003).abs() < 1e-9);
    assert!((cities[0].longitude + 87.65005).abs() < 1e-9);
    assert_eq!(cities[1].label, "Chicago Ridge, CA");

    let location = cities[0].to_location();
    assert!(location.is_defined());
}

#[tokio::test]
async fn test_search_tags() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tags/search")
        .match_query(Matcher::UrlEncoded("searchstring".into(), "mu".into()))
        .with_status(200)
        .with_body(r#"["music", "museums"]"#)
        .create_async()
        .await;

    let tags = client(&server.url()).search_tags("mu").await.unwrap();

    assert_eq!(tags, vec!["music".to_string(), "museums".to_string()]);
}

#[tokio::test]
async fn test_search_tags_keeps_commas() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/tags/search")
        .match_query(Matcher::UrlEncoded("searchstring".into(), "rock, roll".into()))
        .with_status(200)
        .with_body(r#"["rock, roll"]"#)
        .create_async()
        .await;

    let tags = client(&server.url()).search_tags("rock, roll").await.unwrap();

    mock.assert_async().await;
    assert_eq!(tags, vec!["rock, roll".to_string()]);
}

#[tokio::test]
async fn test_list_happenings_sends_filters_and_skips_malformed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/happenings")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("tags".into(), "games".into()),
            Matcher::UrlEncoded("latitude".into(), "40.75".into()),
            Matcher::UrlEncoded("longitude".into(), "-73.997".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[
                {"_id": "51a4f1e2b5c4d3e2f1a0b9c8", "name": "Board game night",
                 "dates": {"beginDate": "2013-05-01T19:00:00Z", "endDate": "2013-05-01T23:00:00Z"},
                 "location": {"latitude": 40.73, "longitude": -73.99, "cityName": "New York City"},
                 "tags": ["games"], "websiteUrl": "example.com"},
                {"name": "missing dates"}
            ]"#,
        )
        .create_async()
        .await;

    let query = HappeningQuery {
        tag: Some(TagId::new("games")),
        near: Location::at(40.75, -73.997).coordinate(),
    };
    let happenings = client(&server.url()).list_happenings(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(happenings.len(), 1);
    assert_eq!(happenings[0].id.as_deref(), Some("51a4f1e2b5c4d3e2f1a0b9c8"));
    assert_eq!(happenings[0].location.city.as_deref(), Some("New York City"));
    assert!(happenings[0].has_tag(&TagId::new("games")));
}

#[tokio::test]
async fn test_list_happenings_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/happenings")
        .with_status(503)
        .create_async()
        .await;

    let result = client(&server.url()).list_happenings(&HappeningQuery::default()).await;

    assert!(matches!(result, Err(BackendError::ApiError(_))));
}

#[tokio::test]
async fn test_create_happening_posts_query_string() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/happenings")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "Jazz in the park".into()),
            Matcher::UrlEncoded("cityid".into(), "5128581".into()),
            Matcher::UrlEncoded("tags".into(), "music,outdoors".into()),
        ]))
        .with_status(201)
        .with_body("")
        .create_async()
        .await;

    let submission = HappeningSubmission {
        name: "Jazz in the park".to_string(),
        city_id: "5128581".to_string(),
        begin_date: "2013-06-01".to_string(),
        end_date: "2013-06-01".to_string(),
        website_url: "jazz.example.com".to_string(),
        tags: vec!["music".to_string(), "outdoors".to_string()],
    };

    let body = client(&server.url()).create_happening(&submission).await.unwrap();

    mock.assert_async().await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_session_sort_change_does_not_refetch() {
    // "park" and "pier" share a venue, so their distances tie
    let source = CountingSource::new(vec![
        create_happening("far", 42.3583, -71.0603, 1),
        create_happening("park", 40.76, -73.99, 20),
        create_happening("pier", 40.76, -73.99, 10),
    ]);
    let mut session = Session::new(source, DistanceUnit::Miles);

    session.start(Some(Location::at(40.75, -73.997)), None).await;
    assert_eq!(session.source().calls(), 1);

    let names = |session: &Session<CountingSource>| -> Vec<String> {
        session.state().happenings().iter().map(|h| h.name.clone()).collect()
    };
    let by_distance = names(&session);
    assert_eq!(by_distance, vec!["park", "pier", "far"]);

    session
        .dispatch(Action::SelectSort {
            mode: SortMode::TimeFromDate,
            reference_date: Utc.with_ymd_and_hms(2013, 4, 1, 0, 0, 0).unwrap(),
        })
        .await;

    assert_eq!(session.source().calls(), 1);
    assert_eq!(names(&session), vec!["far", "pier", "park"]);
    assert_eq!(session.state().load_state(), LoadState::Available);

    session
        .dispatch(Action::SelectSort {
            mode: SortMode::DistanceFromLocation,
            reference_date: Utc::now(),
        })
        .await;

    assert_eq!(session.source().calls(), 1);
    assert_eq!(names(&session), by_distance);
}

#[tokio::test]
async fn test_session_tag_change_refetches_once() {
    let mut tagged = create_happening("chess", 40.76, -73.99, 2);
    tagged.tags = vec![TagId::new("games")];
    let source = CountingSource::new(vec![tagged, create_happening("jazz", 40.76, -73.99, 3)]);
    let mut session = Session::new(source, DistanceUnit::Miles);

    session.start(None, Some(Location::at(40.75, -73.997))).await;
    session.dispatch(Action::SetTag(Some(TagId::new("games")))).await;
    // Same tag again: nothing to do
    session.dispatch(Action::SetTag(Some(TagId::new("games")))).await;

    assert_eq!(session.source().calls(), 2);
    assert_eq!(session.state().happenings().len(), 1);
    assert_eq!(session.state().happenings()[0].name, "chess");
}

#[tokio::test]
async fn test_session_against_backend() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/happenings")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut session = Session::new(client(&server.url()), DistanceUnit::Kilometers);
    session.start(Some(Location::at(0.0, 0.0)), None).await;

    assert!(session.state().is_location_defined());
    assert_eq!(session.state().load_state(), LoadState::Empty);
}
