use crate::core::distance::DistanceUnit;
use crate::core::ranking::{sort_happenings, Comparator, SortMode};
use crate::models::{Happening, HappeningQuery, Location, TagId};
use chrono::{DateTime, Utc};

/// Where the happening list stands relative to its latest fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight
    Pending,
    /// The latest fetch returned no happenings, or failed
    Empty,
    Available,
}

/// State changes the view can be asked to make
#[derive(Debug, Clone)]
pub enum Action {
    SetLocation(Location),
    SetTag(Option<TagId>),
    SelectSort {
        mode: SortMode,
        reference_date: DateTime<Utc>,
    },
    /// Re-fetch with the current filters, e.g. after a submission
    Refresh,
    FetchCompleted {
        generation: u64,
        happenings: Vec<Happening>,
    },
    FetchFailed {
        generation: u64,
        reason: String,
    },
}

/// Work the owner of the state must carry out
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(FetchRequest),
}

/// A fetch to run; its result must be fed back with the same generation
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: HappeningQuery,
}

/// Reference location, tag filter, sort order and the loaded happenings
///
/// Mutated only through [`ViewState::dispatch`]. A location or tag change
/// always yields exactly one fetch; completions from superseded fetches are
/// dropped so the list reflects the most recent request only.
#[derive(Debug, Clone)]
pub struct ViewState {
    reference_location: Location,
    active_tag: Option<TagId>,
    sort_mode: SortMode,
    reference_date: DateTime<Utc>,
    unit: DistanceUnit,
    /// Latest completed fetch, in the order the backend returned it
    fetched: Vec<Happening>,
    /// `fetched` ordered by the active comparator
    happenings: Vec<Happening>,
    load_state: LoadState,
    latest_generation: u64,
}

impl ViewState {
    pub fn new(unit: DistanceUnit) -> Self {
        Self {
            reference_location: Location::default(),
            active_tag: None,
            sort_mode: SortMode::default(),
            reference_date: Utc::now(),
            unit,
            fetched: Vec::new(),
            happenings: Vec::new(),
            load_state: LoadState::Idle,
            latest_generation: 0,
        }
    }

    pub fn reference_location(&self) -> &Location {
        &self.reference_location
    }

    pub fn active_tag(&self) -> Option<&TagId> {
        self.active_tag.as_ref()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn happenings(&self) -> &[Happening] {
        &self.happenings
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Whether distances can be shown and distance sorting is meaningful
    pub fn is_location_defined(&self) -> bool {
        self.reference_location.is_defined()
    }

    /// The comparator for the active sort mode
    pub fn comparator(&self) -> Comparator {
        match self.sort_mode {
            SortMode::DistanceFromLocation => Comparator::DistanceFromLocation {
                location: self.reference_location.clone(),
                unit: self.unit,
            },
            SortMode::TimeFromDate => Comparator::TimeFromDate(self.reference_date),
        }
    }

    /// Query matching the current filters
    pub fn query(&self) -> HappeningQuery {
        HappeningQuery {
            tag: self.active_tag.clone(),
            near: self.reference_location.coordinate(),
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::SetLocation(location) => {
                if location == self.reference_location {
                    return None;
                }
                tracing::debug!("Reference location changed to {:?}", location.display_name());
                self.reference_location = location;
                Some(self.request_fetch())
            }
            Action::SetTag(tag) => {
                if tag == self.active_tag {
                    return None;
                }
                tracing::debug!("Tag filter changed to {:?}", tag);
                self.active_tag = tag;
                Some(self.request_fetch())
            }
            Action::SelectSort { mode, reference_date } => {
                self.sort_mode = mode;
                if mode == SortMode::TimeFromDate {
                    self.reference_date = reference_date;
                }
                if mode == SortMode::DistanceFromLocation && !self.is_location_defined() {
                    tracing::debug!("Distance sort selected before a reference location is known");
                }
                self.resort();
                None
            }
            Action::Refresh => Some(self.request_fetch()),
            Action::FetchCompleted { generation, happenings } => {
                if generation != self.latest_generation {
                    tracing::debug!(
                        "Discarding superseded fetch {} (latest is {})",
                        generation,
                        self.latest_generation
                    );
                    return None;
                }
                self.replace_happenings(happenings);
                None
            }
            Action::FetchFailed { generation, reason } => {
                if generation != self.latest_generation {
                    return None;
                }
                tracing::warn!("Fetching happenings failed, showing none: {}", reason);
                self.replace_happenings(Vec::new());
                None
            }
        }
    }

    fn request_fetch(&mut self) -> Effect {
        self.latest_generation += 1;
        self.load_state = LoadState::Pending;
        Effect::Fetch(FetchRequest {
            generation: self.latest_generation,
            query: self.query(),
        })
    }

    fn replace_happenings(&mut self, happenings: Vec<Happening>) {
        self.fetched = happenings;
        self.resort();
        self.load_state = if self.happenings.is_empty() {
            LoadState::Empty
        } else {
            LoadState::Available
        };
    }

    /// Ties always fall back to fetch order, whatever was shown before
    fn resort(&mut self) {
        let comparator = self.comparator();
        let mut sorted = self.fetched.clone();
        sort_happenings(&mut sorted, &comparator);
        self.happenings = sorted;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DistanceUnit::default())
    }
}
