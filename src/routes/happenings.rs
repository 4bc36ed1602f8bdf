use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::RankingSettings;
use crate::core::{
    calculate_distance, filter_by_tag, filter_within_radius, sort_happenings, Comparator, DistanceUnit, LoadState,
    SortMode,
};
use crate::core::validation::is_valid_object_id;
use crate::models::{
    tag_suggestions, DistanceParams, DistanceResponse, ErrorResponse, Happening, HappeningSubmission,
    HappeningsParams, HappeningsResponse, HealthResponse, Location, RankRequest, RankedHappening,
    SearchParams, TagSubmission,
};
use crate::services::{BackendClient, SearchCache};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub cache: Arc<SearchCache>,
    pub ranking: RankingSettings,
}

/// Configure all happening-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/distance", web::get().to(distance))
        .route("/happenings", web::get().to(list_happenings))
        .route("/happenings", web::post().to(create_happening))
        .route("/happenings/rank", web::post().to(rank_happenings))
        .route("/happenings/{id}", web::put().to(update_happening))
        .route("/cities/search", web::get().to(search_cities))
        .route("/tags/search", web::get().to(search_tags))
        .route("/tags", web::post().to(create_tag));
}

fn error_response(status: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    };
    match status {
        400 => HttpResponse::BadRequest().json(body),
        502 => HttpResponse::BadGateway().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Rank `happenings` and wrap them for the response
fn ranked_response(
    mut happenings: Vec<Happening>,
    sort: SortMode,
    reference: &Location,
    date: DateTime<Utc>,
    unit: DistanceUnit,
) -> HappeningsResponse {
    let comparator = match sort {
        SortMode::DistanceFromLocation => Comparator::DistanceFromLocation {
            location: reference.clone(),
            unit,
        },
        SortMode::TimeFromDate => Comparator::TimeFromDate(date),
    };
    if sort == SortMode::DistanceFromLocation && !reference.is_defined() {
        tracing::debug!("No reference location, leaving order unchanged");
    }

    sort_happenings(&mut happenings, &comparator);

    let status = if happenings.is_empty() { LoadState::Empty } else { LoadState::Available };

    HappeningsResponse {
        status: status.into(),
        sort,
        unit,
        happenings: happenings
            .into_iter()
            .map(|h| RankedHappening::new(h, reference, unit))
            .collect(),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let stats = state.cache.stats();
    tracing::trace!("Cache entries: {} cities, {} tags", stats.city_entries, stats.tag_entries);

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Distance between two points
///
/// GET /api/v1/distance?lat1=..&lon1=..&lat2=..&lon2=..&unit=km|mi
async fn distance(state: web::Data<AppState>, query: web::Query<DistanceParams>) -> impl Responder {
    let unit = query.unit.unwrap_or(state.ranking.unit);

    match calculate_distance(query.lat1, query.lon1, query.lat2, query.lon2, unit) {
        Ok(distance) => HttpResponse::Ok().json(DistanceResponse { distance, unit }),
        Err(e) => error_response(400, "invalid_argument", e.to_string()),
    }
}

/// List happenings from the backend, ranked
///
/// GET /api/v1/happenings?tags=..&latitude=..&longitude=..&radius=..&sort=..&unit=..
///
/// A backend failure is reported as an empty list.
async fn list_happenings(
    state: web::Data<AppState>,
    query: web::Query<HappeningsParams>,
) -> impl Responder {
    let params = query.into_inner();
    let unit = params.unit.unwrap_or(state.ranking.unit);
    let sort = params.sort.unwrap_or(state.ranking.default_sort);

    let mut reference = params.reference_location();
    if !reference.is_defined() {
        if let Some(fallback) = &state.ranking.default_location {
            reference = fallback.clone();
        }
    }

    let mut backend_query = params.query();
    backend_query.near = reference.coordinate();

    let happenings = match state.backend.list_happenings(&backend_query).await {
        Ok(happenings) => happenings,
        Err(e) => {
            tracing::warn!("Backend unavailable, returning no happenings: {}", e);
            Vec::new()
        }
    };

    let happenings = match (params.radius, reference.coordinate()) {
        (Some(radius), Some(center)) if center.is_valid() => {
            filter_within_radius(happenings, center, radius, unit)
        }
        _ => happenings,
    };

    let date = params.date.unwrap_or_else(Utc::now);
    let response = ranked_response(happenings, sort, &reference, date, unit);

    tracing::info!(
        "Returning {} happenings (tag: {:?}, sort: {:?})",
        response.happenings.len(),
        params.tags,
        sort
    );

    HttpResponse::Ok().json(response)
}

/// Rank a caller-supplied list
///
/// POST /api/v1/happenings/rank
///
/// Request body:
/// ```json
/// {
///   "happenings": [...],
///   "sort": "distanceFromLocation|timeFromDate",
///   "location": {"latitude": 40.75, "longitude": -73.997},
///   "date": "2013-05-01T00:00:00Z",
///   "unit": "miles",
///   "tag": "games"
/// }
/// ```
async fn rank_happenings(state: web::Data<AppState>, req: web::Json<RankRequest>) -> impl Responder {
    let req = req.into_inner();
    let unit = req.unit.unwrap_or(state.ranking.unit);
    let reference = req.location.unwrap_or_default();
    let date = req.date.unwrap_or_else(Utc::now);

    let happenings = filter_by_tag(req.happenings, req.tag.as_ref());
    let response = ranked_response(happenings, req.sort, &reference, date, unit);
    HttpResponse::Ok().json(response)
}

/// City autocomplete
///
/// GET /api/v1/cities/search?searchstring=..
async fn search_cities(state: web::Data<AppState>, query: web::Query<SearchParams>) -> impl Responder {
    let term = crate::services::backend::search_term(&query.searchstring);
    if term.is_empty() {
        return HttpResponse::Ok().json(Vec::<crate::models::CitySuggestion>::new());
    }

    if let Some(cached) = state.cache.cities(term).await {
        return HttpResponse::Ok().json(cached);
    }

    match state.backend.search_cities(term).await {
        Ok(cities) => {
            state.cache.store_cities(term, cities.clone()).await;
            HttpResponse::Ok().json(cities)
        }
        Err(e) => {
            tracing::error!("City search failed for {}: {}", term, e);
            error_response(502, "Failed to search cities", e.to_string())
        }
    }
}

/// Tag autocomplete
///
/// GET /api/v1/tags/search?searchstring=..
async fn search_tags(state: web::Data<AppState>, query: web::Query<SearchParams>) -> impl Responder {
    let term = query.searchstring.as_str();
    if term.trim().is_empty() {
        return HttpResponse::Ok().json(Vec::<crate::models::TagSuggestion>::new());
    }

    if let Some(cached) = state.cache.tags(term).await {
        return HttpResponse::Ok().json(cached);
    }

    match state.backend.search_tags(term).await {
        Ok(tags) => {
            let suggestions = tag_suggestions(tags);
            state.cache.store_tags(term, suggestions.clone()).await;
            HttpResponse::Ok().json(suggestions)
        }
        Err(e) => {
            tracing::error!("Tag search failed for {}: {}", term, e);
            error_response(502, "Failed to search tags", e.to_string())
        }
    }
}

/// Submit a new happening
///
/// POST /api/v1/happenings
async fn create_happening(
    state: web::Data<AppState>,
    req: web::Json<HappeningSubmission>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for happening submission: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    match state.backend.create_happening(&req).await {
        Ok(body) => {
            tracing::info!("Created happening {}", req.name);
            HttpResponse::Created().json(body)
        }
        Err(e) => error_response(502, "Failed to create happening", e.to_string()),
    }
}

/// Edit an existing happening
///
/// PUT /api/v1/happenings/{id}
async fn update_happening(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<HappeningSubmission>,
) -> impl Responder {
    let id = path.into_inner();
    if !is_valid_object_id(&id) {
        return error_response(400, "Invalid happening id", format!("{} is not a valid object id", id));
    }
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    match state.backend.update_happening(&id, &req).await {
        Ok(body) => {
            tracing::info!("Updated happening {}", id);
            HttpResponse::Ok().json(body)
        }
        Err(e) => error_response(502, "Failed to update happening", e.to_string()),
    }
}

/// Create a tag
///
/// POST /api/v1/tags
async fn create_tag(state: web::Data<AppState>, req: web::Json<TagSubmission>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    match state.backend.create_tag(&req).await {
        Ok(body) => {
            state.cache.invalidate_tags();
            HttpResponse::Created().json(body)
        }
        Err(e) => error_response(502, "Failed to create tag", e.to_string()),
    }
}
